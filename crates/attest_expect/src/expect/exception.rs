use std::panic::{self, AssertUnwindSafe};

use attest_eval::Evaluator;
use attest_fmt::{ExpressionFormatter, ValueFormatter};
use attest_ir::{Node, ObjectType, Raised};

use super::Expect;
use crate::messages;

/// Expects evaluating `body` to raise an error of a given type.
///
/// Passes iff an error was raised and its type is the expected type or
/// derives from it. Panics inside user handles count as `Panic` errors.
pub struct ExceptionExpect {
    body: Node,
    expected: ObjectType,
    raised: Option<Raised>,
}

impl ExceptionExpect {
    /// Evaluates `body` once, capturing whatever it raises.
    pub fn capture(
        evaluator: &Evaluator,
        formatter: &ExpressionFormatter,
        body: Node,
        expected: ObjectType,
    ) -> Self {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| evaluator.evaluate(&body)));
        let raised = match outcome {
            Ok(Ok(_)) => None,
            Ok(Err(error)) => Some(crate::into_raised(error, formatter)),
            Err(payload) => Some(Raised::from_panic(payload.as_ref())),
        };
        ExceptionExpect {
            body,
            expected,
            raised,
        }
    }

    /// The captured error, if any.
    pub fn raised(&self) -> Option<&Raised> {
        self.raised.as_ref()
    }

    pub fn into_raised(self) -> Option<Raised> {
        self.raised
    }
}

impl Expect for ExceptionExpect {
    fn check(&self) -> bool {
        self.raised
            .as_ref()
            .is_some_and(|raised| raised.is_instance_of(&self.expected))
    }

    fn format_expression(&self, formatter: &ExpressionFormatter) -> String {
        let expression = formatter.format(self.body.unwrap_thunk());
        match &self.raised {
            None => messages::missing_exception(&expression),
            Some(raised) => messages::unexpected_exception(
                &expression,
                self.expected.name(),
                raised.ty().name(),
            ),
        }
    }

    fn format_message(&self, _values: &ValueFormatter) -> String {
        String::new()
    }
}
