use attest_eval::Comparison;
use attest_fmt::{ExpressionFormatter, ValueFormatter};
use attest_ir::{BinaryOp, Node, Raised, Value};

use super::Expect;
use crate::messages;

/// Equality, inequality and ordering.
///
/// The operator result is taken as evaluated, so a user-defined operator
/// decides the outcome while the message still shows both operands.
pub struct BinaryExpect {
    body: Node,
    op: BinaryOp,
    actual: Value,
    expected: Value,
    holds: bool,
}

impl BinaryExpect {
    pub fn new(body: Node, comparison: Comparison) -> Result<Self, Raised> {
        let Value::Bool(holds) = comparison.result else {
            return Err(Raised::invalid_cast(format!(
                "operator `{}` produced {}, expected bool",
                comparison.op.as_symbol(),
                comparison.result.ty()
            )));
        };
        Ok(BinaryExpect {
            body,
            op: comparison.op,
            actual: comparison.left,
            expected: comparison.right,
            holds,
        })
    }

    pub fn actual(&self) -> &Value {
        &self.actual
    }

    pub fn expected(&self) -> &Value {
        &self.expected
    }
}

impl Expect for BinaryExpect {
    fn check(&self) -> bool {
        self.holds
    }

    fn format_expression(&self, formatter: &ExpressionFormatter) -> String {
        formatter.format(&self.body)
    }

    fn format_message(&self, values: &ValueFormatter) -> String {
        let actual = values.format(&self.actual);
        let expected = values.format(&self.expected);
        match self.op {
            BinaryOp::Eq => messages::equal(&actual, &expected),
            BinaryOp::NotEq => messages::not_equal(&expected),
            op => messages::ordering(op, &actual, &expected),
        }
    }
}
