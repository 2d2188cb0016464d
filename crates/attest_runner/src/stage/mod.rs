//! Execution stage chain.
//!
//! A test runs through a fixed chain of stages, outermost first:
//!
//! 1. [`Timing`]: measures everything inside it
//! 2. [`FixtureBeforeAfter`]: setup-each and teardown-each hooks
//! 3. [`PendingGuard`]: inverts the outcome of pending tests
//! 4. [`MethodInvocation`]: runs the body
//!
//! Each stage is handed the rest of the chain as [`Next`] and decides
//! whether and how to run it.

use std::time::{Duration, Instant};

use attest_ir::{Raised, Value};

use crate::case::Test;
use crate::fixture::Fixture;
use crate::guard::guarded;
use crate::result::{FailureKind, TestName, TestResult, TestStatus};

/// What every stage can see of the running test.
#[derive(Clone, Copy)]
pub struct StageContext<'a> {
    pub test: &'a Test,
    pub fixture: &'a Fixture,
    pub instance: &'a Value,
}

impl StageContext<'_> {
    /// Pending reason of the test, or of its fixture.
    pub fn pending_reason(&self) -> Option<&str> {
        self.test
            .pending_reason()
            .or_else(|| self.fixture.description().pending_reason())
    }
}

/// One link of the chain.
pub trait Stage: Send + Sync {
    fn run(&self, cx: StageContext<'_>, result: &mut dyn TestResult, next: Next<'_>);
}

/// The remainder of the chain after the current stage.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    stages: &'a [Box<dyn Stage>],
}

impl<'a> Next<'a> {
    pub fn new(stages: &'a [Box<dyn Stage>]) -> Self {
        Next { stages }
    }

    /// Runs the next stage, if any.
    pub fn run(self, cx: StageContext<'_>, result: &mut dyn TestResult) {
        if let Some((stage, rest)) = self.stages.split_first() {
            stage.run(cx, result, Next { stages: rest });
        }
    }
}

/// The standard chain.
pub fn default_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(Timing),
        Box::new(FixtureBeforeAfter),
        Box::new(PendingGuard),
        Box::new(MethodInvocation),
    ]
}

/// Attaches the elapsed time of the rest of the chain to the result,
/// whatever the outcome.
#[derive(Copy, Clone, Debug, Default)]
pub struct Timing;

impl Stage for Timing {
    fn run(&self, cx: StageContext<'_>, result: &mut dyn TestResult, next: Next<'_>) {
        let start = Instant::now();
        next.run(cx, result);
        let elapsed = start.elapsed();
        tracing::trace!(test = %cx.test.name(), ?elapsed, "test timed");
        result.record_duration(elapsed);
    }
}

/// Runs the fixture's setup-each hooks before the rest of the chain and its
/// after hooks on every exit path.
///
/// A failing setup records `SetupFailure` and skips the body. The after
/// hooks still run; their failure is then logged but keeps `SetupFailure`.
/// Otherwise a failing after hook overwrites whatever the body recorded
/// with `TeardownFailure`; both failures stay logged.
#[derive(Copy, Clone, Debug, Default)]
pub struct FixtureBeforeAfter;

impl Stage for FixtureBeforeAfter {
    fn run(&self, cx: StageContext<'_>, result: &mut dyn TestResult, next: Next<'_>) {
        if let Err(error) = cx.fixture.before(cx.instance) {
            result.failure(FailureKind::Setup, error);
            if let Err(error) = cx.fixture.after(cx.instance, &*result) {
                if result.status().is_terminal() {
                    result.report_failure(FailureKind::Teardown, error);
                } else {
                    result.failure(FailureKind::Teardown, error);
                }
            }
            return;
        }

        next.run(cx, result);

        if let Err(error) = cx.fixture.after(cx.instance, &*result) {
            result.failure(FailureKind::Teardown, error);
        }
    }
}

/// For pending tests, a failing body is the expected outcome.
///
/// A body failure becomes `Pending(reason)` and is not logged; a body that
/// completes records `TestFailure` with "test passed unexpectedly".
#[derive(Copy, Clone, Debug, Default)]
pub struct PendingGuard;

impl Stage for PendingGuard {
    fn run(&self, cx: StageContext<'_>, result: &mut dyn TestResult, next: Next<'_>) {
        let Some(reason) = cx.pending_reason() else {
            next.run(cx, result);
            return;
        };

        let mut watched = PendingResult {
            inner: &mut *result,
            failed: false,
        };
        next.run(cx, &mut watched);
        let failed = watched.failed;

        if failed {
            result.pending(reason);
        } else if result.status().is_success() {
            result.failure(
                FailureKind::Test,
                Raised::assertion_failed("test passed unexpectedly"),
            );
        }
    }
}

/// Swallows test failures of a pending test so the guard can decide.
struct PendingResult<'a> {
    inner: &'a mut dyn TestResult,
    failed: bool,
}

impl TestResult for PendingResult<'_> {
    fn name(&self) -> &TestName {
        self.inner.name()
    }

    fn status(&self) -> &TestStatus {
        self.inner.status()
    }

    fn set_status(&mut self, status: TestStatus) {
        self.inner.set_status(status);
    }

    fn report_failure(&mut self, kind: FailureKind, error: Raised) {
        self.inner.report_failure(kind, error);
    }

    fn record_duration(&mut self, elapsed: Duration) {
        self.inner.record_duration(elapsed);
    }

    fn failure(&mut self, kind: FailureKind, error: Raised) {
        if kind == FailureKind::Test {
            self.failed = true;
        } else {
            self.inner.failure(kind, error);
        }
    }
}

/// Runs the body: `Success` when it completes, `TestFailure` when it
/// returns an error or panics.
#[derive(Copy, Clone, Debug, Default)]
pub struct MethodInvocation;

impl Stage for MethodInvocation {
    fn run(&self, cx: StageContext<'_>, result: &mut dyn TestResult, _next: Next<'_>) {
        match guarded(|| cx.test.run(cx.instance)) {
            Ok(()) => result.success(),
            Err(error) => result.failure(FailureKind::Test, error),
        }
    }
}

#[cfg(test)]
mod tests;
