//! Evaluation errors.
//!
//! Evaluation either produces a value or one of two explicit error values:
//!
//! - `EvalError::Fault`: a target sub-expression evaluated to null. Carries
//!   the offending node and its context so diagnostics can point at it.
//! - `EvalError::Raised`: an error raised by user code (a method, property,
//!   conversion or constructor) or by a runtime check. User errors are
//!   passed through exactly as raised.
//!
//! `UnsupportedExpression` is not an evaluation result. It is reported by
//! the supportability scan and only selects the compiled fallback.

use std::fmt;

use attest_ir::{Fault, Node, Raised, Value};

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Evaluation failure.
#[derive(Clone, Debug)]
pub enum EvalError {
    Fault(Fault),
    Raised(Raised),
}

impl EvalError {
    pub fn as_fault(&self) -> Option<&Fault> {
        match self {
            EvalError::Fault(fault) => Some(fault),
            EvalError::Raised(_) => None,
        }
    }

    pub fn as_raised(&self) -> Option<&Raised> {
        match self {
            EvalError::Raised(raised) => Some(raised),
            EvalError::Fault(_) => None,
        }
    }
}

impl From<Raised> for EvalError {
    fn from(raised: Raised) -> Self {
        EvalError::Raised(raised)
    }
}

impl From<Fault> for EvalError {
    fn from(fault: Fault) -> Self {
        EvalError::Fault(fault)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Fault(fault) => write!(
                f,
                "null sub-expression ({}) in {}",
                fault.offender.kind().name(),
                fault.context.kind().name()
            ),
            EvalError::Raised(raised) => write!(f, "{raised}"),
        }
    }
}

impl std::error::Error for EvalError {}

/// A node shape the interpreter does not handle.
#[derive(Clone, Debug)]
pub struct UnsupportedExpression {
    pub node: Node,
}

impl fmt::Display for UnsupportedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported expression: {}", self.node.kind().name())
    }
}
