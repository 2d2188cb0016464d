use attest_eval::Call;
use attest_fmt::{ExpressionFormatter, ValueFormatter};
use attest_ir::{Node, Raised, Value};

use super::Expect;
use crate::messages;
use crate::phrasing::Phrasing;

/// A boolean method call with a registered phrasing.
///
/// Passes or fails exactly like the call's result; the phrasing only
/// replaces the description of what was expected.
pub struct MethodExpect {
    body: Node,
    call: Call,
    holds: bool,
    phrasing: Phrasing,
}

impl MethodExpect {
    pub fn new(body: Node, call: Call, phrasing: Phrasing) -> Result<Self, Raised> {
        let Value::Bool(holds) = call.result else {
            return Err(Raised::invalid_cast(format!(
                "`{}` produced {}, expected bool",
                call.method.name(),
                call.result.ty()
            )));
        };
        Ok(MethodExpect {
            body,
            call,
            holds,
            phrasing,
        })
    }

    /// Description of the expected outcome.
    pub fn format_expected(&self, values: &ValueFormatter) -> String {
        (self.phrasing)(&self.call.args, values)
    }
}

impl Expect for MethodExpect {
    fn check(&self) -> bool {
        self.holds
    }

    fn format_expression(&self, formatter: &ExpressionFormatter) -> String {
        formatter.format(&self.body)
    }

    fn format_message(&self, values: &ValueFormatter) -> String {
        let actual = self
            .call
            .target
            .as_ref()
            .map_or_else(|| values.format(&self.call.result), |target| values.format(target));
        messages::equal(&actual, &self.format_expected(values))
    }
}
