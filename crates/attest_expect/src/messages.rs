//! Failure message templates.

use attest_ir::BinaryOp;

pub fn equal(actual: &str, expected: &str) -> String {
    format!("  Expected: {expected}\n  But was: {actual}")
}

pub fn not_equal(expected: &str) -> String {
    format!("  Didn't expect {expected}")
}

pub fn ordering(op: BinaryOp, actual: &str, expected: &str) -> String {
    let relation = match op {
        BinaryOp::Lt => "less than",
        BinaryOp::LtEq => "less than or equal to",
        BinaryOp::Gt => "greater than",
        BinaryOp::GtEq => "greater than or equal to",
        _ => op.as_symbol(),
    };
    format!("  Expected: {relation} {expected}\n  But was: {actual}")
}

pub fn missing_exception(expression: &str) -> String {
    format!("{expression} didn't raise an exception.")
}

pub fn unexpected_exception(expression: &str, expected: &str, actual: &str) -> String {
    format!(
        "{expression} raised the wrong type of exception\n  Expected: {expected}\n  Actual: {actual}"
    )
}

pub fn null_subexpression(offender: &str, context: &str) -> String {
    format!("`{offender}` was null in `{context}`")
}

pub fn unsupported(kind: &str) -> String {
    format!("can't verify expression of kind {kind}")
}
