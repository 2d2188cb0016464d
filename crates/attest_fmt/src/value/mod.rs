//! Value formatter.
//!
//! Literal-like text for runtime values, used in failure messages and in
//! generated test names.

use attest_ir::{Object, Value};

use crate::expression::ExpressionFormatter;

/// Renders `Value`s as text.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueFormatter;

impl ValueFormatter {
    pub fn new() -> Self {
        ValueFormatter
    }

    pub fn format(self, value: &Value) -> String {
        let mut out = String::new();
        write_value(&mut out, value, &mut Vec::new());
        out
    }

    /// Comma-separated values, e.g. the arguments of a test row.
    pub fn format_all(self, values: &[Value]) -> String {
        let mut out = String::new();
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_value(&mut out, value, &mut Vec::new());
        }
        out
    }
}

/// `enclosing` lists the objects being written further up; an object met
/// again is written as `Type { .. }`.
fn write_value(out: &mut String, value: &Value, enclosing: &mut Vec<Object>) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Float(x) => out.push_str(&format!("{x:?}")),
        Value::Str(s) => {
            out.push('"');
            out.extend(s.chars().flat_map(char::escape_debug));
            out.push('"');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item, enclosing);
            }
            out.push(']');
        }
        Value::Object(object) => {
            out.push_str(object.ty().name());
            if enclosing.iter().any(|outer| outer.ptr_eq(object)) {
                out.push_str(" { .. }");
                return;
            }
            let fields = object.fields();
            if !fields.is_empty() {
                enclosing.push(object.clone());
                out.push_str(" { ");
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(name);
                    out.push_str(": ");
                    write_value(out, value, enclosing);
                }
                out.push_str(" }");
                enclosing.pop();
            }
        }
        Value::Expr(node) => out.push_str(&ExpressionFormatter::new().format(node)),
        Value::Func(_) => out.push_str("<fn>"),
    }
}

#[cfg(test)]
mod tests;
