//! Expression formatter.
//!
//! Produces source-like text for a captured expression:
//!
//! | Node                       | Text                      |
//! |----------------------------|---------------------------|
//! | member on a captured local | `Member`                  |
//! | static member              | `Declaring.Member`        |
//! | member                     | `target.Member`           |
//! | call                       | `target.method(a, b)`     |
//! | array length               | `target.Length`           |
//! | lambda                     | `(x, y) => body`          |
//! | comparison                 | `left == right`           |
//!
//! Parentheses are inserted only where operator precedence requires them.

use attest_ir::{Node, NodeKind};

use crate::value::ValueFormatter;

/// Binding strength of atomic and postfix forms (`a`, `a.b`, `a[i]`, `f(x)`).
const PREC_POSTFIX: u8 = 0;
/// Binding strength of prefix forms (`!a`, `(ty)a`).
const PREC_PREFIX: u8 = 2;
const PREC_CONDITIONAL: u8 = 15;
const PREC_LAMBDA: u8 = 16;

/// Renders `Node` trees as readable text.
#[derive(Clone, Debug, Default)]
pub struct ExpressionFormatter {
    /// Type whose static members are rendered without their type name,
    /// typically the fixture the assertion is written in.
    context: Option<String>,
    values: ValueFormatter,
}

impl ExpressionFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A formatter that omits `context.` in front of static members
    /// declared by `context`.
    pub fn with_context(context: impl Into<String>) -> Self {
        ExpressionFormatter {
            context: Some(context.into()),
            values: ValueFormatter::new(),
        }
    }

    /// The formatter used for constants.
    pub fn values(&self) -> &ValueFormatter {
        &self.values
    }

    pub fn format(&self, node: &Node) -> String {
        let mut out = String::new();
        self.write(&mut out, node);
        out
    }

    fn write(&self, out: &mut String, node: &Node) {
        match node.kind() {
            NodeKind::Constant { value, .. } => out.push_str(&self.values.format(value)),
            NodeKind::MemberAccess { target, member } => {
                match target {
                    None => self.write_declaring(out, member.declaring()),
                    Some(target) if matches!(target.kind(), NodeKind::Constant { .. }) => {}
                    Some(target) => {
                        self.write_operand(out, target, PREC_POSTFIX);
                        out.push('.');
                    }
                }
                out.push_str(member.name());
            }
            NodeKind::MethodCall {
                target,
                method,
                args,
            } => {
                match target {
                    None => self.write_declaring(out, method.declaring()),
                    Some(target) => {
                        self.write_operand(out, target, PREC_POSTFIX);
                        out.push('.');
                    }
                }
                out.push_str(method.name());
                self.write_args(out, args);
            }
            NodeKind::Binary {
                op, left, right, ..
            } => {
                let prec = op.precedence();
                self.write_operand(out, left, prec);
                out.push(' ');
                out.push_str(op.as_symbol());
                out.push(' ');
                // Binary operators are left-associative.
                self.write_operand(out, right, prec - 1);
            }
            NodeKind::Convert { operand, ty, .. } => {
                out.push('(');
                out.push_str(&ty.to_string());
                out.push(')');
                self.write_operand(out, operand, PREC_PREFIX);
            }
            NodeKind::New { ty, args, .. } => {
                out.push_str("new ");
                out.push_str(&ty.to_string());
                self.write_args(out, args);
            }
            NodeKind::ArrayIndex { array, index } => {
                self.write_operand(out, array, PREC_POSTFIX);
                out.push('[');
                self.write(out, index);
                out.push(']');
            }
            NodeKind::ArrayLength { array } => {
                self.write_operand(out, array, PREC_POSTFIX);
                out.push_str(".Length");
            }
            NodeKind::Quote { inner } => self.write(out, inner),
            NodeKind::Lambda { params, body } => {
                self.write_args(out, params);
                out.push_str(" => ");
                self.write(out, body);
            }
            NodeKind::Parameter { name, .. } => out.push_str(name),
            NodeKind::Invoke { callee, args } => {
                self.write_operand(out, callee, PREC_POSTFIX);
                self.write_args(out, args);
            }
            NodeKind::Not { operand } => {
                out.push('!');
                self.write_operand(out, operand, PREC_PREFIX);
            }
            NodeKind::Conditional {
                test,
                then,
                otherwise,
            } => {
                self.write_operand(out, test, PREC_CONDITIONAL - 1);
                out.push_str(" ? ");
                self.write_operand(out, then, PREC_CONDITIONAL);
                out.push_str(" : ");
                self.write_operand(out, otherwise, PREC_CONDITIONAL);
            }
        }
    }

    /// Writes `node`, parenthesized when it binds less tightly than `max`.
    fn write_operand(&self, out: &mut String, node: &Node, max: u8) {
        if precedence(node) > max {
            out.push('(');
            self.write(out, node);
            out.push(')');
        } else {
            self.write(out, node);
        }
    }

    fn write_declaring(&self, out: &mut String, declaring: &str) {
        if self.context.as_deref() != Some(declaring) {
            out.push_str(declaring);
            out.push('.');
        }
    }

    fn write_args(&self, out: &mut String, args: &[Node]) {
        out.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write(out, arg);
        }
        out.push(')');
    }
}

fn precedence(node: &Node) -> u8 {
    match node.kind() {
        NodeKind::Binary { op, .. } => op.precedence(),
        NodeKind::Not { .. } | NodeKind::Convert { .. } => PREC_PREFIX,
        NodeKind::Conditional { .. } => PREC_CONDITIONAL,
        NodeKind::Lambda { .. } => PREC_LAMBDA,
        NodeKind::Quote { inner } => precedence(inner),
        _ => PREC_POSTFIX,
    }
}

#[cfg(test)]
mod tests;
