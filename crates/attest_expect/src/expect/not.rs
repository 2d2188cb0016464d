use attest_fmt::{ExpressionFormatter, ValueFormatter};

use super::Expect;

/// Negation of another expectation.
///
/// The wrapped expression text is reused as is; only the outcome flips. A
/// failed negation has nothing useful to say beyond the expression, so the
/// message is empty and the failure reads `!(expression)`.
pub struct NotExpect {
    inner: Box<dyn Expect>,
}

impl NotExpect {
    pub fn new(inner: Box<dyn Expect>) -> Self {
        NotExpect { inner }
    }
}

impl Expect for NotExpect {
    fn check(&self) -> bool {
        !self.inner.check()
    }

    fn format_expression(&self, formatter: &ExpressionFormatter) -> String {
        self.inner.format_expression(formatter)
    }

    fn format_message(&self, _values: &ValueFormatter) -> String {
        String::new()
    }

    fn format_failure(&self, formatter: &ExpressionFormatter) -> String {
        format!("!({})", self.format_expression(formatter))
    }
}
