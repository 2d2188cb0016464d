//! Assertion entry point.
//!
//! [`Verifier::that`] classifies a captured expression by its top-level
//! shape, binds it to an expectation (evaluating it exactly once), and
//! reports a failure through the configured [`FailureHandler`].

use std::fmt;
use std::sync::Arc;

use attest_eval::Evaluator;
use attest_fmt::ExpressionFormatter;
use attest_ir::{Node, NodeKind, ObjectType, Raised};

use crate::expect::{BinaryExpect, BooleanExpect, ExceptionExpect, Expect, MethodExpect, NotExpect};
use crate::phrasing::MethodPhrasings;
use crate::{into_raised, messages};

/// Receives the formatted text of every failed assertion.
///
/// Returning `Ok` lets the assertion call return normally, so a handler can
/// collect failures instead of raising them.
pub type FailureHandler = Arc<dyn Fn(String) -> Result<(), Raised> + Send + Sync>;

fn raise_assertion_failed() -> FailureHandler {
    Arc::new(|message| Err(Raised::assertion_failed(message)))
}

/// Checks captured expressions.
#[derive(Clone)]
pub struct Verifier {
    evaluator: Evaluator,
    phrasings: MethodPhrasings,
    formatter: ExpressionFormatter,
    on_failure: FailureHandler,
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("evaluator", &self.evaluator)
            .field("phrasings", &self.phrasings)
            .field("formatter", &self.formatter)
            .finish_non_exhaustive()
    }
}

impl Verifier {
    /// A verifier with the default evaluator and string phrasings that
    /// raises `AssertionFailed` on failure.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> VerifierBuilder {
        VerifierBuilder::default()
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn formatter(&self) -> &ExpressionFormatter {
        &self.formatter
    }

    /// Asserts that `node` holds.
    ///
    /// Errors raised while evaluating `node` are returned as they are; null
    /// targets become `NullSubexpression` errors. A failed check goes to the
    /// failure handler, whose result is returned.
    pub fn that(&self, node: &Node) -> Result<(), Raised> {
        let expect = self.bind(node)?;
        if expect.check() {
            return Ok(());
        }
        self.fail(expect.format_failure(&self.formatter))
    }

    /// Asserts every node in `nodes`, reporting all failures together.
    ///
    /// Each node is evaluated exactly once. Evaluation errors stop the
    /// assertion at the offending node.
    pub fn all(&self, nodes: &[Node]) -> Result<(), Raised> {
        let mut failures = Vec::new();
        for node in nodes {
            let expect = self.bind(node)?;
            if !expect.check() {
                failures.push(expect.format_failure(&self.formatter));
            }
        }
        if failures.is_empty() {
            return Ok(());
        }
        self.fail(failures.join("\n\n"))
    }

    /// Asserts that evaluating `node` raises an error of type `expected` (or a
    /// type derived from it) and returns that error.
    ///
    /// Panics inside user handles are caught and treated as `Panic` errors.
    pub fn raises(&self, node: &Node, expected: &ObjectType) -> Result<Raised, Raised> {
        let expect = ExceptionExpect::capture(
            &self.evaluator,
            &self.formatter,
            node.clone(),
            expected.clone(),
        );
        if let Some(raised) = expect.raised().filter(|_| expect.check()) {
            return Ok(raised.clone());
        }
        let failure = expect.format_failure(&self.formatter);
        self.fail(failure.clone())?;
        Err(Raised::assertion_failed(failure))
    }

    /// Reports `message` through the failure handler.
    pub fn fail(&self, message: String) -> Result<(), Raised> {
        tracing::debug!(%message, "assertion failed");
        (self.on_failure)(message)
    }

    /// Classifies `node` by its top-level shape and binds it.
    ///
    /// The expression is evaluated here, once; the returned expectation only
    /// reads what was captured.
    pub fn bind(&self, node: &Node) -> Result<Box<dyn Expect>, Raised> {
        let root = node.unwrap_thunk();
        match root.kind() {
            NodeKind::Not { operand } => Ok(Box::new(NotExpect::new(self.bind(operand)?))),
            NodeKind::Binary { op, .. } if op.is_comparison() => {
                match self.evaluator.evaluate_comparison(root) {
                    Ok(Some(comparison)) => {
                        Ok(Box::new(BinaryExpect::new(root.clone(), comparison)?))
                    }
                    Ok(None) => Err(unsupported(root)),
                    Err(error) => Err(into_raised(error, &self.formatter)),
                }
            }
            NodeKind::MethodCall { method, .. } => {
                if let Some(phrasing) = self.phrasings.get(method) {
                    match self.evaluator.evaluate_call(root) {
                        Ok(Some(call)) => {
                            return Ok(Box::new(MethodExpect::new(
                                root.clone(),
                                call,
                                phrasing.clone(),
                            )?));
                        }
                        Ok(None) => {}
                        Err(error) => return Err(into_raised(error, &self.formatter)),
                    }
                }
                self.bind_boolean(root)
            }
            NodeKind::Constant { .. } | NodeKind::MemberAccess { .. } => self.bind_boolean(root),
            _ => Err(unsupported(root)),
        }
    }

    fn bind_boolean(&self, root: &Node) -> Result<Box<dyn Expect>, Raised> {
        let actual = self
            .evaluator
            .evaluate(root)
            .map_err(|error| into_raised(error, &self.formatter))?;
        Ok(Box::new(BooleanExpect::new(root.clone(), &actual)?))
    }
}

fn unsupported(root: &Node) -> Raised {
    Raised::not_supported(messages::unsupported(root.kind().name()))
}

/// Configures a [`Verifier`].
#[derive(Default)]
pub struct VerifierBuilder {
    evaluator: Option<Evaluator>,
    phrasings: Option<MethodPhrasings>,
    formatter: Option<ExpressionFormatter>,
    on_failure: Option<FailureHandler>,
}

impl VerifierBuilder {
    #[must_use]
    pub fn evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Replaces the default string phrasings.
    #[must_use]
    pub fn phrasings(mut self, phrasings: MethodPhrasings) -> Self {
        self.phrasings = Some(phrasings);
        self
    }

    #[must_use]
    pub fn formatter(mut self, formatter: ExpressionFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    #[must_use]
    pub fn on_failure(
        mut self,
        handler: impl Fn(String) -> Result<(), Raised> + Send + Sync + 'static,
    ) -> Self {
        self.on_failure = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> Verifier {
        Verifier {
            evaluator: self.evaluator.unwrap_or_default(),
            phrasings: self.phrasings.unwrap_or_else(MethodPhrasings::with_defaults),
            formatter: self.formatter.unwrap_or_default(),
            on_failure: self.on_failure.unwrap_or_else(raise_assertion_failed),
        }
    }
}
