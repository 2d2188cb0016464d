use attest_fmt::{ExpressionFormatter, ValueFormatter};
use attest_ir::{Node, Raised, Value};

use super::Expect;
use crate::messages;

/// A plain boolean expression: a constant, a flag field, or a method call
/// without a registered phrasing.
pub struct BooleanExpect {
    body: Node,
    actual: bool,
}

impl BooleanExpect {
    pub fn new(body: Node, actual: &Value) -> Result<Self, Raised> {
        match actual {
            Value::Bool(actual) => Ok(BooleanExpect {
                body,
                actual: *actual,
            }),
            other => Err(Raised::invalid_cast(format!(
                "assertion must produce a bool, got {}",
                other.ty()
            ))),
        }
    }
}

impl Expect for BooleanExpect {
    fn check(&self) -> bool {
        self.actual
    }

    fn format_expression(&self, formatter: &ExpressionFormatter) -> String {
        formatter.format(&self.body)
    }

    fn format_message(&self, values: &ValueFormatter) -> String {
        messages::equal(&values.format(&Value::Bool(self.actual)), "true")
    }
}
