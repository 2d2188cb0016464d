//! Fixtures: the per-suite object tests run against, and its hooks.
//!
//! A [`FixtureDescription`] lists the hooks of a fixture type in the order
//! they run. A [`Fixture`] pairs a description with a factory for the
//! instance; the instance is created lazily, once per suite, by the
//! executor.

use std::fmt;
use std::sync::Arc;

use attest_ir::{Object, ObjectType, Raised, Value};

use crate::guard::guarded;
use crate::result::TestResult;

/// A hook run against the fixture instance.
pub type Hook = Arc<dyn Fn(&Value) -> Result<(), Raised> + Send + Sync>;

/// An after-each hook that also sees the test's result.
pub type ResultHook = Arc<dyn Fn(&Value, &dyn TestResult) -> Result<(), Raised> + Send + Sync>;

/// Creates the fixture instance.
pub type FixtureFactory = Arc<dyn Fn() -> Result<Value, Raised> + Send + Sync>;

/// Ordered hooks of a fixture type and its pending marker.
#[derive(Clone, Default)]
pub struct FixtureDescription {
    setup_all: Vec<Hook>,
    setup_each: Vec<Hook>,
    after_each: Vec<ResultHook>,
    teardown_each: Vec<Hook>,
    teardown_all: Vec<Hook>,
    pending: Option<String>,
}

impl FixtureDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs once, when the instance is created.
    #[must_use]
    pub fn setup_all(
        mut self,
        hook: impl Fn(&Value) -> Result<(), Raised> + Send + Sync + 'static,
    ) -> Self {
        self.setup_all.push(Arc::new(hook));
        self
    }

    /// Runs before every test.
    #[must_use]
    pub fn setup_each(
        mut self,
        hook: impl Fn(&Value) -> Result<(), Raised> + Send + Sync + 'static,
    ) -> Self {
        self.setup_each.push(Arc::new(hook));
        self
    }

    /// Runs after every test, before the teardown hooks, with its result.
    #[must_use]
    pub fn after_each(
        mut self,
        hook: impl Fn(&Value, &dyn TestResult) -> Result<(), Raised> + Send + Sync + 'static,
    ) -> Self {
        self.after_each.push(Arc::new(hook));
        self
    }

    /// Runs after every test.
    #[must_use]
    pub fn teardown_each(
        mut self,
        hook: impl Fn(&Value) -> Result<(), Raised> + Send + Sync + 'static,
    ) -> Self {
        self.teardown_each.push(Arc::new(hook));
        self
    }

    /// Runs once, when the suite releases the instance.
    #[must_use]
    pub fn teardown_all(
        mut self,
        hook: impl Fn(&Value) -> Result<(), Raised> + Send + Sync + 'static,
    ) -> Self {
        self.teardown_all.push(Arc::new(hook));
        self
    }

    /// Marks every test of the fixture pending.
    #[must_use]
    pub fn pending(mut self, reason: impl Into<String>) -> Self {
        self.pending = Some(reason.into());
        self
    }

    pub fn pending_reason(&self) -> Option<&str> {
        self.pending.as_deref()
    }
}

impl fmt::Debug for FixtureDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixtureDescription")
            .field("setup_all", &self.setup_all.len())
            .field("setup_each", &self.setup_each.len())
            .field("after_each", &self.after_each.len())
            .field("teardown_each", &self.teardown_each.len())
            .field("teardown_all", &self.teardown_all.len())
            .field("pending", &self.pending)
            .finish()
    }
}

/// A fixture type: its name, hooks and instance factory.
#[derive(Clone)]
pub struct Fixture {
    name: String,
    description: FixtureDescription,
    factory: FixtureFactory,
}

impl Fixture {
    /// A fixture whose instance is an empty object named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let ty = ObjectType::new(name.as_str());
        Fixture {
            name,
            description: FixtureDescription::default(),
            factory: Arc::new(move || Ok(Value::Object(Object::new(ty.clone())))),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: FixtureDescription) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn with_factory(
        mut self,
        factory: impl Fn() -> Result<Value, Raised> + Send + Sync + 'static,
    ) -> Self {
        self.factory = Arc::new(factory);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &FixtureDescription {
        &self.description
    }

    /// Creates the instance and runs the setup-all hooks.
    pub fn create(&self) -> Result<Value, Raised> {
        let instance = guarded(|| (self.factory)())?;
        run_hooks(&self.description.setup_all, &instance)?;
        Ok(instance)
    }

    /// Setup-each hooks, stopping at the first error.
    pub fn before(&self, instance: &Value) -> Result<(), Raised> {
        run_hooks(&self.description.setup_each, instance)
    }

    /// After-each hooks, then teardown-each hooks, stopping at the first
    /// error.
    pub fn after(&self, instance: &Value, result: &dyn TestResult) -> Result<(), Raised> {
        for hook in &self.description.after_each {
            guarded(|| hook(instance, result))?;
        }
        run_hooks(&self.description.teardown_each, instance)
    }

    /// Teardown-all hooks.
    pub fn release(&self, instance: &Value) -> Result<(), Raised> {
        run_hooks(&self.description.teardown_all, instance)
    }
}

impl fmt::Debug for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fixture")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

fn run_hooks(hooks: &[Hook], instance: &Value) -> Result<(), Raised> {
    hooks.iter().try_for_each(|hook| guarded(|| hook(instance)))
}
