//! Attest Formatter
//!
//! Renders captured expressions and runtime values as text for failure
//! reports and test names. Formatting is purely structural: nothing here
//! evaluates a node.
//!
//! # Modules
//!
//! - [`expression`]: source-like text for a `Node` tree
//! - [`value`]: literal-like text for a `Value`

pub mod expression;
pub mod value;

pub use expression::ExpressionFormatter;
pub use value::ValueFormatter;
