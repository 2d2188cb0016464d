//! Result loggers.
//!
//! The session calls a [`SessionLogger`] around the whole run, a
//! [`SuiteLogger`] around each suite and a [`TestLogger`] per test. Suite
//! and test loggers live on the worker running the suite.

mod report;

pub use report::{SessionReport, SessionSummary};

use crate::result::{FailureRecord, TestName};

/// Session-wide logger, shared by every worker.
pub trait SessionLogger: Send + Sync {
    fn begin_session(&self) {}

    fn begin_suite(&self, suite: &str) -> Box<dyn SuiteLogger + '_>;

    fn end_session(&self) {}
}

pub trait SuiteLogger {
    fn begin_test(&mut self, test: &TestName) -> Box<dyn TestLogger + '_>;

    fn end_suite(&mut self) {}
}

pub trait TestLogger {
    fn success(&mut self);

    fn pending(&mut self, reason: &str);

    fn failure(&mut self, failure: &FailureRecord);

    fn skipped(&mut self);

    fn end_test(&mut self) {}
}

/// Discards every event.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullLogger;

impl SessionLogger for NullLogger {
    fn begin_suite(&self, _suite: &str) -> Box<dyn SuiteLogger + '_> {
        Box::new(NullLogger)
    }
}

impl SuiteLogger for NullLogger {
    fn begin_test(&mut self, _test: &TestName) -> Box<dyn TestLogger + '_> {
        Box::new(NullLogger)
    }
}

impl TestLogger for NullLogger {
    fn success(&mut self) {}

    fn pending(&mut self, _reason: &str) {}

    fn failure(&mut self, _failure: &FailureRecord) {}

    fn skipped(&mut self) {}
}

/// Emits one `tracing` event per test outcome.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingLogger;

impl SessionLogger for TracingLogger {
    fn begin_session(&self) {
        tracing::info!("session started");
    }

    fn begin_suite(&self, suite: &str) -> Box<dyn SuiteLogger + '_> {
        tracing::debug!(suite, "suite started");
        Box::new(TracingSuiteLogger {
            suite: suite.to_string(),
        })
    }

    fn end_session(&self) {
        tracing::info!("session finished");
    }
}

struct TracingSuiteLogger {
    suite: String,
}

impl SuiteLogger for TracingSuiteLogger {
    fn begin_test(&mut self, test: &TestName) -> Box<dyn TestLogger + '_> {
        Box::new(TracingTestLogger { test: test.clone() })
    }

    fn end_suite(&mut self) {
        tracing::debug!(suite = %self.suite, "suite finished");
    }
}

struct TracingTestLogger {
    test: TestName,
}

impl TestLogger for TracingTestLogger {
    fn success(&mut self) {
        tracing::info!(test = %self.test, "passed");
    }

    fn pending(&mut self, reason: &str) {
        tracing::info!(test = %self.test, reason, "pending");
    }

    fn failure(&mut self, failure: &FailureRecord) {
        tracing::warn!(test = %self.test, kind = %failure.kind, error = %failure.error, "failed");
    }

    fn skipped(&mut self) {
        tracing::info!(test = %self.test, "skipped");
    }
}

/// Forwards every event to each of its loggers, in order.
pub struct MulticastLogger<'a> {
    loggers: Vec<&'a dyn SessionLogger>,
}

impl<'a> MulticastLogger<'a> {
    pub fn new(loggers: Vec<&'a dyn SessionLogger>) -> Self {
        MulticastLogger { loggers }
    }
}

impl SessionLogger for MulticastLogger<'_> {
    fn begin_session(&self) {
        for logger in &self.loggers {
            logger.begin_session();
        }
    }

    fn begin_suite(&self, suite: &str) -> Box<dyn SuiteLogger + '_> {
        Box::new(MulticastSuiteLogger {
            loggers: self.loggers.iter().map(|l| l.begin_suite(suite)).collect(),
        })
    }

    fn end_session(&self) {
        for logger in &self.loggers {
            logger.end_session();
        }
    }
}

struct MulticastSuiteLogger<'a> {
    loggers: Vec<Box<dyn SuiteLogger + 'a>>,
}

impl SuiteLogger for MulticastSuiteLogger<'_> {
    fn begin_test(&mut self, test: &TestName) -> Box<dyn TestLogger + '_> {
        Box::new(MulticastTestLogger {
            loggers: self.loggers.iter_mut().map(|l| l.begin_test(test)).collect(),
        })
    }

    fn end_suite(&mut self) {
        for logger in &mut self.loggers {
            logger.end_suite();
        }
    }
}

struct MulticastTestLogger<'a> {
    loggers: Vec<Box<dyn TestLogger + 'a>>,
}

impl TestLogger for MulticastTestLogger<'_> {
    fn success(&mut self) {
        for logger in &mut self.loggers {
            logger.success();
        }
    }

    fn pending(&mut self, reason: &str) {
        for logger in &mut self.loggers {
            logger.pending(reason);
        }
    }

    fn failure(&mut self, failure: &FailureRecord) {
        for logger in &mut self.loggers {
            logger.failure(failure);
        }
    }

    fn skipped(&mut self) {
        for logger in &mut self.loggers {
            logger.skipped();
        }
    }

    fn end_test(&mut self) {
        for logger in &mut self.loggers {
            logger.end_test();
        }
    }
}
