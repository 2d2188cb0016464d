//! Supportability scan.
//!
//! The interpreter handles a fixed set of node shapes. Before interpreting,
//! the whole tree is scanned; if any reachable node is outside that set the
//! tree runs through the compiled fallback instead, so no sub-expression is
//! ever executed twice.

use attest_ir::{Node, NodeKind};

use crate::config::{EvalConfig, RelationalPolicy};
use crate::errors::UnsupportedExpression;
use crate::stack::ensure_sufficient_stack;

/// First node (in evaluation order) the interpreter cannot handle.
pub fn find_unsupported(node: &Node, config: &EvalConfig) -> Option<UnsupportedExpression> {
    ensure_sufficient_stack(|| scan(node, config))
}

fn scan(node: &Node, config: &EvalConfig) -> Option<UnsupportedExpression> {
    let unsupported = || {
        Some(UnsupportedExpression {
            node: node.clone(),
        })
    };
    match node.kind() {
        // Quoted trees are data; they are never evaluated.
        NodeKind::Constant { .. } | NodeKind::Quote { .. } => None,
        NodeKind::MemberAccess { target, .. } => target
            .as_ref()
            .and_then(|t| find_unsupported(t, config)),
        NodeKind::MethodCall { target, args, .. } => target
            .iter()
            .chain(args)
            .find_map(|n| find_unsupported(n, config)),
        NodeKind::Binary {
            op,
            left,
            right,
            overload,
        } => {
            let handled = op.is_equality()
                || (op.is_relational()
                    && (overload.is_some()
                        || config.relational == RelationalPolicy::DefaultOrdering));
            if handled {
                find_unsupported(left, config).or_else(|| find_unsupported(right, config))
            } else {
                unsupported()
            }
        }
        NodeKind::Convert { operand, .. } => find_unsupported(operand, config),
        NodeKind::New { args, .. } => args.iter().find_map(|n| find_unsupported(n, config)),
        NodeKind::ArrayIndex { array, index } => {
            find_unsupported(array, config).or_else(|| find_unsupported(index, config))
        }
        NodeKind::Lambda { params, body } if params.is_empty() => find_unsupported(body, config),
        NodeKind::Lambda { .. }
        | NodeKind::ArrayLength { .. }
        | NodeKind::Parameter { .. }
        | NodeKind::Invoke { .. }
        | NodeKind::Not { .. }
        | NodeKind::Conditional { .. } => unsupported(),
    }
}
