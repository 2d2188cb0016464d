//! Test statuses, failure records and the result recorder.

use std::fmt;
use std::time::Duration;

use attest_ir::{error_types, Raised};

use crate::logger::TestLogger;

/// Display identity of a test: the suite it belongs to and its name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TestName {
    pub suite: String,
    pub name: String,
}

impl TestName {
    pub fn new(suite: impl Into<String>, name: impl Into<String>) -> Self {
        TestName {
            suite: suite.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.suite, self.name)
    }
}

/// Lifecycle state of a single test.
///
/// `NotStarted` and `Running` are transient; every other status is terminal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TestStatus {
    #[default]
    NotStarted,
    Running,
    Success,
    Pending(String),
    SetupFailure,
    TestFailure,
    TeardownFailure,
}

impl TestStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, TestStatus::Success)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TestStatus::Pending(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TestStatus::SetupFailure | TestStatus::TestFailure | TestStatus::TeardownFailure
        )
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TestStatus::NotStarted | TestStatus::Running)
    }
}

/// Lifecycle phase a failure happened in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Setup,
    Test,
    Teardown,
}

impl FailureKind {
    /// Status recorded for a failure of this kind.
    pub fn status(self) -> TestStatus {
        match self {
            FailureKind::Setup => TestStatus::SetupFailure,
            FailureKind::Test => TestStatus::TestFailure,
            FailureKind::Teardown => TestStatus::TeardownFailure,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::Setup => "setup",
            FailureKind::Test => "test",
            FailureKind::Teardown => "teardown",
        })
    }
}

/// One logged failure.
#[derive(Clone, Debug)]
pub struct FailureRecord {
    pub test: TestName,
    pub kind: FailureKind,
    pub error: Raised,
}

impl FailureRecord {
    pub fn new(test: TestName, kind: FailureKind, error: Raised) -> Self {
        FailureRecord { test, kind, error }
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.test)?;
        if self.kind != FailureKind::Test {
            write!(f, " ({})", self.kind)?;
        }
        // Assertion failures are already readable; anything else keeps its type.
        if self.error.ty() == &error_types::assertion_failed() {
            write!(f, ": {}", self.error.message())
        } else {
            write!(f, ": {}", self.error)
        }
    }
}

/// What a stage sees of the test it runs.
///
/// Statuses move forward only through these methods. A failure both sets
/// the status for its kind and is reported; `report_failure` alone logs a
/// failure without touching the status.
pub trait TestResult {
    fn name(&self) -> &TestName;

    fn status(&self) -> &TestStatus;

    fn set_status(&mut self, status: TestStatus);

    /// Logs `error` without changing the status.
    fn report_failure(&mut self, kind: FailureKind, error: Raised);

    fn record_duration(&mut self, elapsed: Duration);

    fn success(&mut self) {
        self.set_status(TestStatus::Success);
    }

    fn pending(&mut self, reason: &str) {
        self.set_status(TestStatus::Pending(reason.to_string()));
    }

    fn failure(&mut self, kind: FailureKind, error: Raised) {
        self.set_status(kind.status());
        self.report_failure(kind, error);
    }
}

/// Records one test's outcome into its logger.
///
/// Failures are logged as they happen. Success and pending are logged once
/// by [`Recorder::finish`], from the final status, so a test whose teardown
/// fails after a passing body is never logged as passed.
pub struct Recorder<'a> {
    name: TestName,
    status: TestStatus,
    duration: Duration,
    failures: usize,
    log: &'a mut dyn TestLogger,
}

impl<'a> Recorder<'a> {
    pub fn new(name: TestName, log: &'a mut dyn TestLogger) -> Self {
        Recorder {
            name,
            status: TestStatus::Running,
            duration: Duration::ZERO,
            failures: 0,
            log,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Number of failures logged so far.
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Logs the final status and returns it.
    pub fn finish(self) -> TestStatus {
        match &self.status {
            TestStatus::Success => self.log.success(),
            TestStatus::Pending(reason) => self.log.pending(reason),
            _ => {}
        }
        self.status
    }
}

impl TestResult for Recorder<'_> {
    fn name(&self) -> &TestName {
        &self.name
    }

    fn status(&self) -> &TestStatus {
        &self.status
    }

    fn set_status(&mut self, status: TestStatus) {
        self.status = status;
    }

    fn report_failure(&mut self, kind: FailureKind, error: Raised) {
        self.failures += 1;
        self.log
            .failure(&FailureRecord::new(self.name.clone(), kind, error));
    }

    fn record_duration(&mut self, elapsed: Duration) {
        self.duration = elapsed;
    }
}

#[cfg(test)]
mod tests;
