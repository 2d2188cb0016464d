//! Captured expression model for the attest assertion engine.
//!
//! This crate holds the data shared by every other stage:
//!
//! - [`Node`]: the immutable tree a test builds to describe a condition
//! - [`Value`] and [`Ty`]: runtime values and their types
//! - [`Member`] and [`Method`]: invocable handles embedded in nodes
//! - [`Raised`] and [`Fault`]: raised errors and null sub-expression faults
//!
//! Nothing here evaluates or formats a tree; see `attest_eval` and
//! `attest_fmt`.

mod handle;
mod node;
mod operators;
mod raised;
pub mod stdlib;
mod ty;
mod value;

pub use handle::{Member, Method, MethodFn, MethodKey, Param};
pub use node::{Node, NodeKind, Scope};
pub use operators::BinaryOp;
pub use raised::{error_types, Fault, Raised};
pub use ty::{Factory, ObjectType, Ty};
pub use value::{Function, FunctionFn, Object, Value};
