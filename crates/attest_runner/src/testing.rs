//! Test doubles shared by the unit tests.

use std::sync::Arc;

use attest_ir::{Raised, Value};
use parking_lot::Mutex;

use crate::case::Test;
use crate::logger::{SessionLogger, SuiteLogger, TestLogger};
use crate::result::{FailureRecord, TestName};

/// Ordered trace of hook calls and logger events.
#[derive(Clone, Default)]
pub(crate) struct Trace(Arc<Mutex<Vec<String>>>);

impl Trace {
    pub(crate) fn push(&self, event: impl Into<String>) {
        self.0.lock().push(event.into());
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// A hook that records `event` and then returns `outcome`.
    pub(crate) fn hook(
        &self,
        event: &'static str,
        outcome: Result<(), Raised>,
    ) -> impl Fn(&Value) -> Result<(), Raised> + Send + Sync + 'static {
        let trace = self.clone();
        move |_| {
            trace.push(event);
            outcome.clone()
        }
    }

    /// A test named `name` whose body records "body" and returns `outcome`.
    pub(crate) fn test(&self, name: &str, outcome: Result<(), Raised>) -> Test {
        let trace = self.clone();
        Test::new(
            TestName::new("Suite", name),
            Arc::new(move |_: &Value, _: &[Value]| {
                trace.push("body");
                outcome.clone()
            }),
        )
    }
}

/// Logger writing every event into a [`Trace`].
#[derive(Clone, Default)]
pub(crate) struct TraceLogger(pub(crate) Trace);

impl SessionLogger for TraceLogger {
    fn begin_session(&self) {
        self.0.push("begin session");
    }

    fn begin_suite(&self, suite: &str) -> Box<dyn SuiteLogger + '_> {
        self.0.push(format!("begin suite {suite}"));
        Box::new(self.clone())
    }

    fn end_session(&self) {
        self.0.push("end session");
    }
}

impl SuiteLogger for TraceLogger {
    fn begin_test(&mut self, _test: &TestName) -> Box<dyn TestLogger + '_> {
        Box::new(self.clone())
    }

    fn end_suite(&mut self) {
        self.0.push("end suite");
    }
}

impl TestLogger for TraceLogger {
    fn success(&mut self) {
        self.0.push("success");
    }

    fn pending(&mut self, reason: &str) {
        self.0.push(format!("pending: {reason}"));
    }

    fn failure(&mut self, failure: &FailureRecord) {
        self.0.push(format!("{} failure: {}", failure.kind, failure.error.message()));
    }

    fn skipped(&mut self) {
        self.0.push("skipped");
    }
}
