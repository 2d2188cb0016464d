//! Test executor: the stage chain bound to one suite's fixture.

use std::cell::OnceCell;

use attest_ir::{Raised, Value};

use crate::case::Test;
use crate::fixture::Fixture;
use crate::result::TestResult;
use crate::stage::{default_stages, Next, Stage, StageContext};

/// Runs the tests of one suite.
///
/// The fixture instance is created on first use and kept for the life of
/// the executor. A creation failure is kept too, so it is reported for
/// every test without retrying.
pub struct TestExecutor<'a> {
    fixture: &'a Fixture,
    stages: Vec<Box<dyn Stage>>,
    instance: OnceCell<Result<Value, Raised>>,
}

impl<'a> TestExecutor<'a> {
    pub fn new(fixture: &'a Fixture) -> Self {
        TestExecutor {
            fixture,
            stages: default_stages(),
            instance: OnceCell::new(),
        }
    }

    /// Adds `stage` just outside the body, after the built-in stages.
    #[must_use]
    pub fn with_stage(mut self, stage: impl Stage + 'static) -> Self {
        let at = self.stages.len().saturating_sub(1);
        self.stages.insert(at, Box::new(stage));
        self
    }

    pub fn fixture(&self) -> &Fixture {
        self.fixture
    }

    /// The fixture instance, created (with setup-all hooks) on first call.
    pub fn initialize(&self) -> Result<&Value, &Raised> {
        self.instance
            .get_or_init(|| {
                tracing::debug!(fixture = self.fixture.name(), "creating fixture");
                self.fixture.create()
            })
            .as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.instance.get().is_some_and(Result::is_ok)
    }

    /// Runs `test` through the stage chain against an initialized fixture.
    pub fn run(&self, test: &Test, instance: &Value, result: &mut dyn TestResult) {
        let cx = StageContext {
            test,
            fixture: self.fixture,
            instance,
        };
        Next::new(&self.stages).run(cx, result);
    }

    /// Runs the teardown-all hooks if the fixture was created.
    pub fn release(&self) -> Result<(), Raised> {
        match self.instance.get() {
            Some(Ok(instance)) => {
                tracing::debug!(fixture = self.fixture.name(), "releasing fixture");
                self.fixture.release(instance)
            }
            _ => Ok(()),
        }
    }
}
