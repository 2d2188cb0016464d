//! Suites: a fixture and the tests that run against it.

use std::fmt;
use std::sync::Arc;

use attest_expect::Verifier;
use attest_fmt::ExpressionFormatter;
use attest_ir::{Node, Raised, Value};

use crate::case::{Test, TestCase};
use crate::fixture::Fixture;
use crate::naming::{DefaultNamer, TestNamer};

/// The unit of parallel work in a session.
#[derive(Clone)]
pub struct Suite {
    fixture: Fixture,
    tests: Vec<Test>,
    namer: Arc<dyn TestNamer>,
    verifier: Verifier,
}

impl Suite {
    pub fn new(fixture: Fixture) -> Self {
        let verifier = Verifier::builder()
            .formatter(ExpressionFormatter::with_context(fixture.name()))
            .build();
        Suite {
            fixture,
            tests: Vec::new(),
            namer: Arc::new(DefaultNamer::new()),
            verifier,
        }
    }

    /// Names tests added from now on with `namer`.
    #[must_use]
    pub fn with_namer(mut self, namer: impl TestNamer + 'static) -> Self {
        self.namer = Arc::new(namer);
        self
    }

    /// Checks expressions added with [`Suite::check`] with `verifier`.
    #[must_use]
    pub fn with_verifier(mut self, verifier: Verifier) -> Self {
        self.verifier = verifier;
        self
    }

    #[must_use]
    pub fn case(mut self, case: &TestCase) -> Self {
        let tests = case.expand(self.fixture.name(), self.namer.as_ref());
        self.tests.extend(tests);
        self
    }

    #[must_use]
    pub fn test(
        self,
        name: &str,
        body: impl Fn(&Value, &[Value]) -> Result<(), Raised> + Send + Sync + 'static,
    ) -> Self {
        self.case(&TestCase::new(name, body))
    }

    /// A test asserting the captured expression `node`.
    #[must_use]
    pub fn check(self, name: &str, node: Node) -> Self {
        let verifier = self.verifier.clone();
        self.test(name, move |_, _| verifier.that(&node))
    }

    pub fn name(&self) -> &str {
        self.fixture.name()
    }

    pub fn fixture(&self) -> &Fixture {
        &self.fixture
    }

    pub fn tests(&self) -> &[Test] {
        &self.tests
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("fixture", &self.fixture)
            .field("tests", &self.tests)
            .finish_non_exhaustive()
    }
}
