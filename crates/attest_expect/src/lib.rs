//! Expectations and the assertion entry point.
//!
//! A captured expression is classified by its top-level shape into a bound
//! [`Expect`], evaluated once, checked, and reported through the
//! [`Verifier`]'s failure handler when it does not hold.

pub mod expect;
pub mod messages;
mod phrasing;
mod verifier;

pub use expect::{BinaryExpect, BooleanExpect, ExceptionExpect, Expect, MethodExpect, NotExpect};
pub use phrasing::{MethodPhrasings, Phrasing};
pub use verifier::{FailureHandler, Verifier, VerifierBuilder};

use attest_eval::EvalError;
use attest_fmt::ExpressionFormatter;
use attest_ir::Raised;

/// Converts an evaluation error into the error the caller sees.
///
/// Errors raised by user code pass through untouched. A fault becomes a
/// `NullSubexpression` error naming the offender and its context.
pub(crate) fn into_raised(error: EvalError, formatter: &ExpressionFormatter) -> Raised {
    match error {
        EvalError::Raised(raised) => raised,
        EvalError::Fault(fault) => {
            let message = messages::null_subexpression(
                &formatter.format(&fault.offender),
                &formatter.format(&fault.context),
            );
            Raised::null_subexpression(fault, message)
        }
    }
}
