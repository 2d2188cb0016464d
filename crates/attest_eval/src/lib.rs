//! Attest Evaluator
//!
//! Evaluates captured expression trees.
//!
//! # Architecture
//!
//! Evaluation is two-tier:
//!
//! 1. **Interpreter**: walks the tree and attributes a null target to the
//!    exact sub-expression that produced it (`EvalError::Fault`).
//! 2. **Compiled fallback**: trees containing shapes the interpreter does
//!    not handle are lowered to closures and run as ordinary code.
//!
//! A supportability scan picks the tier before anything runs, so every
//! sub-expression is evaluated exactly once.
//!
//! # Modules
//!
//! - [`config`]: evaluator options
//! - [`conversion`]: the shared conversion-function cache
//! - [`errors`]: evaluation results and errors

mod compile;
pub mod config;
pub mod conversion;
pub mod errors;
mod interpreter;
mod invoke;
mod stack;
mod support;

pub use config::{EvalConfig, RelationalPolicy};
pub use conversion::{build_conversion, ConversionBuilder, ConversionCache, ConversionFn};
pub use errors::{EvalError, EvalResult, UnsupportedExpression};
pub use interpreter::{Call, Comparison, Evaluator};
pub use stack::ensure_sufficient_stack;
pub use support::find_unsupported;
