//! Expectations.
//!
//! An expectation is a bound check: every value it needs was computed when
//! it was created, so `check` and the `format_*` methods can be called any
//! number of times without re-running the asserted expression.
//!
//! All variants share one capability set ([`Expect`]); new variants are
//! added by implementing it.

mod binary;
mod boolean;
mod exception;
mod method;
mod not;

pub use binary::BinaryExpect;
pub use boolean::BooleanExpect;
pub use exception::ExceptionExpect;
pub use method::MethodExpect;
pub use not::NotExpect;

use attest_fmt::{ExpressionFormatter, ValueFormatter};

/// A bound check with formatting.
pub trait Expect: Send + Sync {
    /// Whether the expectation holds.
    fn check(&self) -> bool;

    /// The asserted expression, as text.
    fn format_expression(&self, formatter: &ExpressionFormatter) -> String;

    /// Expected versus actual, or empty when the expression says it all.
    fn format_message(&self, values: &ValueFormatter) -> String;

    /// Full failure text: the expression, then the message if there is one.
    fn format_failure(&self, formatter: &ExpressionFormatter) -> String {
        let expression = self.format_expression(formatter);
        let message = self.format_message(formatter.values());
        if message.is_empty() {
            expression
        } else {
            format!("{expression}\n{message}")
        }
    }
}

impl<E: Expect + ?Sized> Expect for Box<E> {
    fn check(&self) -> bool {
        (**self).check()
    }

    fn format_expression(&self, formatter: &ExpressionFormatter) -> String {
        (**self).format_expression(formatter)
    }

    fn format_message(&self, values: &ValueFormatter) -> String {
        (**self).format_message(values)
    }

    fn format_failure(&self, formatter: &ExpressionFormatter) -> String {
        (**self).format_failure(formatter)
    }
}
