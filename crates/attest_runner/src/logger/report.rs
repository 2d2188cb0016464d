//! Session-level aggregation.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::{SessionLogger, SuiteLogger, TestLogger};
use crate::result::{FailureRecord, TestName};

/// Aggregates results across every suite of a session.
///
/// Counters are atomic and failures are appended under a lock, so suites
/// running on different workers can share one report.
#[derive(Debug, Default)]
pub struct SessionReport {
    passed: AtomicUsize,
    pending: AtomicUsize,
    excluded: AtomicUsize,
    failures: Mutex<Vec<FailureRecord>>,
    started: Mutex<Option<Instant>>,
    elapsed: Mutex<Duration>,
}

impl SessionReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the counts so far.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            passed: self.passed.load(Ordering::Relaxed),
            pending: self.pending.load(Ordering::Relaxed),
            excluded: self.excluded.load(Ordering::Relaxed),
            failures: self.failures.lock().clone(),
            elapsed: *self.elapsed.lock(),
        }
    }
}

impl SessionLogger for SessionReport {
    fn begin_session(&self) {
        *self.started.lock() = Some(Instant::now());
    }

    fn begin_suite(&self, _suite: &str) -> Box<dyn SuiteLogger + '_> {
        Box::new(ReportLogger { report: self })
    }

    fn end_session(&self) {
        if let Some(started) = *self.started.lock() {
            *self.elapsed.lock() = started.elapsed();
        }
    }
}

struct ReportLogger<'a> {
    report: &'a SessionReport,
}

impl SuiteLogger for ReportLogger<'_> {
    fn begin_test(&mut self, _test: &TestName) -> Box<dyn TestLogger + '_> {
        Box::new(ReportLogger {
            report: self.report,
        })
    }
}

impl TestLogger for ReportLogger<'_> {
    fn success(&mut self) {
        self.report.passed.fetch_add(1, Ordering::Relaxed);
    }

    fn pending(&mut self, _reason: &str) {
        self.report.pending.fetch_add(1, Ordering::Relaxed);
    }

    fn failure(&mut self, failure: &FailureRecord) {
        self.report.failures.lock().push(failure.clone());
    }

    fn skipped(&mut self) {
        self.report.excluded.fetch_add(1, Ordering::Relaxed);
    }
}

/// Final counts of a session.
///
/// `failed` counts failure records, so a test whose body and teardown both
/// fail contributes two.
#[derive(Clone, Debug, Default)]
pub struct SessionSummary {
    pub passed: usize,
    pub pending: usize,
    pub excluded: usize,
    pub failures: Vec<FailureRecord>,
    pub elapsed: Duration,
}

impl SessionSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed() + self.excluded
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Get exit code: 0 = all pass, 1 = failures, 2 = no tests found.
    pub fn exit_code(&self) -> i32 {
        if self.total() == 0 && self.pending == 0 {
            2
        } else {
            i32::from(self.has_failures())
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} tests found. {} Passed. {} Failed. ({} Skipped)",
            self.total(),
            self.passed,
            self.failed(),
            self.excluded
        )?;
        if self.has_failures() {
            writeln!(f, "Failures:")?;
            for (n, failure) in self.failures.iter().enumerate() {
                writeln!(f, "{}) {failure}", n + 1)?;
            }
        }
        writeln!(f)?;
        write!(f, "Done in {:.2?}.", self.elapsed)
    }
}
