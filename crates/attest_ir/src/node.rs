//! Captured expression nodes.
//!
//! A `Node` is an immutable, reference-counted tree built once per assertion
//! call and only read afterwards. The evaluator and the formatter both walk
//! the same tree; neither mutates it.
//!
//! Call sites build trees with the associated builder functions:
//!
//! ```text
//! let scope = Scope::new();
//! let foo = scope.bind("foo", object);
//! let check = Node::eq(Node::member(foo, bar), Node::constant(42));
//! ```

use std::sync::Arc;

use crate::handle::{Member, Method};
use crate::operators::BinaryOp;
use crate::ty::{ObjectType, Ty};
use crate::value::{Object, Value};

/// The shape of one node.
#[derive(Debug)]
pub enum NodeKind {
    Constant {
        value: Value,
        ty: Ty,
    },
    /// Field or property read. `target` is `None` for static members.
    MemberAccess {
        target: Option<Node>,
        member: Member,
    },
    /// Method call. `target` is `None` for static methods.
    MethodCall {
        target: Option<Node>,
        method: Method,
        args: Vec<Node>,
    },
    Binary {
        op: BinaryOp,
        left: Node,
        right: Node,
        /// User-defined operator, taking `(left, right)`.
        overload: Option<Method>,
    },
    Convert {
        operand: Node,
        ty: Ty,
        /// User-defined conversion operator, taking the operand.
        conversion: Option<Method>,
    },
    New {
        ty: Ty,
        ctor: Option<Method>,
        args: Vec<Node>,
    },
    ArrayIndex {
        array: Node,
        index: Node,
    },
    ArrayLength {
        array: Node,
    },
    /// A nested expression used as data; evaluates to itself.
    Quote {
        inner: Node,
    },
    /// `params` are `Parameter` nodes.
    Lambda {
        params: Vec<Node>,
        body: Node,
    },
    Parameter {
        name: Arc<str>,
        ty: Ty,
    },
    /// Call of a function value.
    Invoke {
        callee: Node,
        args: Vec<Node>,
    },
    Not {
        operand: Node,
    },
    Conditional {
        test: Node,
        then: Node,
        otherwise: Node,
    },
}

impl NodeKind {
    /// Human-readable name of the node shape, used in diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            NodeKind::Constant { .. } => "Constant",
            NodeKind::MemberAccess { .. } => "MemberAccess",
            NodeKind::MethodCall { .. } => "MethodCall",
            NodeKind::Binary { .. } => "Binary",
            NodeKind::Convert { .. } => "Convert",
            NodeKind::New { .. } => "New",
            NodeKind::ArrayIndex { .. } => "ArrayIndex",
            NodeKind::ArrayLength { .. } => "ArrayLength",
            NodeKind::Quote { .. } => "Quote",
            NodeKind::Lambda { .. } => "Lambda",
            NodeKind::Parameter { .. } => "Parameter",
            NodeKind::Invoke { .. } => "Invoke",
            NodeKind::Not { .. } => "Not",
            NodeKind::Conditional { .. } => "Conditional",
        }
    }
}

/// A captured expression (sub)tree.
#[derive(Clone, Debug)]
pub struct Node(Arc<NodeKind>);

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node(Arc::new(kind))
    }

    pub fn kind(&self) -> &NodeKind {
        &self.0
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Static type of this node.
    pub fn ty(&self) -> Ty {
        match self.kind() {
            NodeKind::Constant { ty, .. }
            | NodeKind::Convert { ty, .. }
            | NodeKind::New { ty, .. }
            | NodeKind::Parameter { ty, .. } => ty.clone(),
            NodeKind::MemberAccess { member, .. } => member.ty().clone(),
            NodeKind::MethodCall { method, .. } => method.return_ty().clone(),
            NodeKind::Binary {
                overload: Some(method),
                ..
            } => method.return_ty().clone(),
            NodeKind::Binary { op, left, right, .. } => {
                if op.is_comparison() || matches!(op, BinaryOp::And | BinaryOp::Or) {
                    Ty::Bool
                } else if left.ty() == Ty::Float || right.ty() == Ty::Float {
                    Ty::Float
                } else {
                    left.ty()
                }
            }
            NodeKind::ArrayIndex { .. } | NodeKind::Invoke { .. } => Ty::Any,
            NodeKind::ArrayLength { .. } => Ty::Int,
            NodeKind::Quote { .. } => Ty::Expr,
            NodeKind::Lambda { .. } => Ty::Func,
            NodeKind::Not { .. } => Ty::Bool,
            NodeKind::Conditional { then, .. } => then.ty(),
        }
    }

    // Builders

    /// Constant typed by its value (`Any` for null).
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        let ty = match &value {
            Value::Null => Ty::Any,
            value => value.ty(),
        };
        Node::new(NodeKind::Constant { value, ty })
    }

    /// Constant with an explicit declared type, e.g. a typed null.
    pub fn typed_constant(value: impl Into<Value>, ty: Ty) -> Self {
        Node::new(NodeKind::Constant {
            value: value.into(),
            ty,
        })
    }

    pub fn null() -> Self {
        Node::typed_constant(Value::Null, Ty::Any)
    }

    pub fn member(target: Node, member: Member) -> Self {
        Node::new(NodeKind::MemberAccess {
            target: Some(target),
            member,
        })
    }

    pub fn static_member(member: Member) -> Self {
        Node::new(NodeKind::MemberAccess {
            target: None,
            member,
        })
    }

    pub fn call(target: Node, method: Method, args: Vec<Node>) -> Self {
        Node::new(NodeKind::MethodCall {
            target: Some(target),
            method,
            args,
        })
    }

    pub fn static_call(method: Method, args: Vec<Node>) -> Self {
        Node::new(NodeKind::MethodCall {
            target: None,
            method,
            args,
        })
    }

    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Self {
        Node::new(NodeKind::Binary {
            op,
            left,
            right,
            overload: None,
        })
    }

    pub fn binary_with(op: BinaryOp, left: Node, right: Node, overload: Method) -> Self {
        Node::new(NodeKind::Binary {
            op,
            left,
            right,
            overload: Some(overload),
        })
    }

    pub fn eq(left: Node, right: Node) -> Self {
        Node::binary(BinaryOp::Eq, left, right)
    }

    pub fn ne(left: Node, right: Node) -> Self {
        Node::binary(BinaryOp::NotEq, left, right)
    }

    pub fn lt(left: Node, right: Node) -> Self {
        Node::binary(BinaryOp::Lt, left, right)
    }

    pub fn le(left: Node, right: Node) -> Self {
        Node::binary(BinaryOp::LtEq, left, right)
    }

    pub fn gt(left: Node, right: Node) -> Self {
        Node::binary(BinaryOp::Gt, left, right)
    }

    pub fn ge(left: Node, right: Node) -> Self {
        Node::binary(BinaryOp::GtEq, left, right)
    }

    pub fn convert(operand: Node, ty: Ty) -> Self {
        Node::new(NodeKind::Convert {
            operand,
            ty,
            conversion: None,
        })
    }

    pub fn convert_with(operand: Node, conversion: Method) -> Self {
        Node::new(NodeKind::Convert {
            operand,
            ty: conversion.return_ty().clone(),
            conversion: Some(conversion),
        })
    }

    /// Construction by type, without a resolved constructor.
    pub fn construct(ty: Ty, args: Vec<Node>) -> Self {
        Node::new(NodeKind::New {
            ty,
            ctor: None,
            args,
        })
    }

    pub fn construct_with(ctor: Method, args: Vec<Node>) -> Self {
        Node::new(NodeKind::New {
            ty: ctor.return_ty().clone(),
            ctor: Some(ctor),
            args,
        })
    }

    pub fn index(array: Node, index: Node) -> Self {
        Node::new(NodeKind::ArrayIndex { array, index })
    }

    pub fn length(array: Node) -> Self {
        Node::new(NodeKind::ArrayLength { array })
    }

    pub fn quote(inner: Node) -> Self {
        Node::new(NodeKind::Quote { inner })
    }

    pub fn lambda(params: Vec<Node>, body: Node) -> Self {
        Node::new(NodeKind::Lambda { params, body })
    }

    /// Zero-parameter lambda, the usual shape of a captured assertion.
    pub fn thunk(body: Node) -> Self {
        Node::lambda(Vec::new(), body)
    }

    pub fn parameter(name: impl Into<Arc<str>>, ty: Ty) -> Self {
        Node::new(NodeKind::Parameter {
            name: name.into(),
            ty,
        })
    }

    pub fn invoke(callee: Node, args: Vec<Node>) -> Self {
        Node::new(NodeKind::Invoke { callee, args })
    }

    pub fn not(operand: Node) -> Self {
        Node::new(NodeKind::Not { operand })
    }

    pub fn conditional(test: Node, then: Node, otherwise: Node) -> Self {
        Node::new(NodeKind::Conditional {
            test,
            then,
            otherwise,
        })
    }

    /// Body of a zero-parameter lambda, or the node itself.
    pub fn unwrap_thunk(&self) -> &Node {
        match self.kind() {
            NodeKind::Lambda { params, body } if params.is_empty() => body,
            _ => self,
        }
    }
}

/// Captured local variables.
///
/// A scope is one closure object; each local is a field on it. Reading a
/// local is a member access on the scope constant, so locals format as bare
/// names and output parameters can write back into them.
#[derive(Clone)]
pub struct Scope {
    object: Object,
    node: Node,
}

impl Scope {
    pub fn new() -> Self {
        let object = Object::new(ObjectType::new("<locals>"));
        let node = Node::typed_constant(
            Value::Object(object.clone()),
            Ty::Object(object.ty().clone()),
        );
        Scope { object, node }
    }

    /// Declares a local typed by its value and returns a node reading it.
    pub fn bind(&self, name: &str, value: impl Into<Value>) -> Node {
        let value = value.into();
        let ty = match &value {
            Value::Null => Ty::Any,
            value => value.ty(),
        };
        self.declare(name, ty, value)
    }

    /// Declares a local with an explicit type.
    pub fn declare(&self, name: &str, ty: Ty, value: impl Into<Value>) -> Node {
        self.object.set(name, value);
        self.local(name, ty)
    }

    /// A node reading an already declared local.
    pub fn local(&self, name: &str, ty: Ty) -> Node {
        Node::member(
            self.node.clone(),
            Member::field(self.object.ty(), name, ty),
        )
    }

    /// Current value of a local.
    pub fn get(&self, name: &str) -> Value {
        self.object.get(name).unwrap_or(Value::Null)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::new()
    }
}
