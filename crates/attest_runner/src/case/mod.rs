//! Runnable tests and row expansion.

use std::fmt;
use std::sync::Arc;

use attest_ir::{Raised, Value};

use crate::naming::TestNamer;
use crate::result::TestName;

/// A test body: runs against the fixture instance with the row arguments.
pub type TestBody = Arc<dyn Fn(&Value, &[Value]) -> Result<(), Raised> + Send + Sync>;

/// One runnable test.
#[derive(Clone)]
pub struct Test {
    name: TestName,
    args: Vec<Value>,
    pending: Option<String>,
    body: TestBody,
}

impl Test {
    pub fn new(name: TestName, body: TestBody) -> Self {
        Test {
            name,
            args: Vec::new(),
            pending: None,
            body,
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    #[must_use]
    pub fn pending(mut self, reason: impl Into<String>) -> Self {
        self.pending = Some(reason.into());
        self
    }

    pub fn name(&self) -> &TestName {
        &self.name
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn pending_reason(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Runs the body once.
    pub fn run(&self, fixture: &Value) -> Result<(), Raised> {
        (self.body)(fixture, &self.args)
    }
}

impl fmt::Debug for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Test")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

/// One row of a data-driven test.
#[derive(Clone, Debug, Default)]
pub struct Row {
    pub args: Vec<Value>,
    /// Display name overriding the test's base name.
    pub name: Option<String>,
    pub pending: Option<String>,
}

impl Row {
    pub fn new(args: Vec<Value>) -> Self {
        Row {
            args,
            ..Row::default()
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn pending(mut self, reason: impl Into<String>) -> Self {
        self.pending = Some(reason.into());
        self
    }
}

/// A test method before expansion: a base name, a body and optional rows.
#[derive(Clone)]
pub struct TestCase {
    base: String,
    body: TestBody,
    rows: Option<Vec<Row>>,
    pending: Option<String>,
}

impl TestCase {
    pub fn new(
        base: impl Into<String>,
        body: impl Fn(&Value, &[Value]) -> Result<(), Raised> + Send + Sync + 'static,
    ) -> Self {
        TestCase {
            base: base.into(),
            body: Arc::new(body),
            rows: None,
            pending: None,
        }
    }

    /// Expands into one test per row, all sharing the body.
    #[must_use]
    pub fn rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = Some(rows);
        self
    }

    #[must_use]
    pub fn pending(mut self, reason: impl Into<String>) -> Self {
        self.pending = Some(reason.into());
        self
    }

    /// The tests this case stands for, named by `namer`.
    pub fn expand(&self, suite: &str, namer: &dyn TestNamer) -> Vec<Test> {
        let Some(rows) = &self.rows else {
            let name = TestName::new(suite, namer.name_for(&self.base, None));
            let mut test = Test::new(name, Arc::clone(&self.body));
            test.pending.clone_from(&self.pending);
            return vec![test];
        };
        rows.iter()
            .map(|row| {
                let display = match &row.name {
                    Some(name) => name.clone(),
                    None => namer.name_for(&self.base, Some(&row.args)),
                };
                let mut test = Test::new(TestName::new(suite, display), Arc::clone(&self.body))
                    .with_args(row.args.clone());
                test.pending = row.pending.clone().or_else(|| self.pending.clone());
                test
            })
            .collect()
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("base", &self.base)
            .field("rows", &self.rows)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
