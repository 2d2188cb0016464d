use attest_ir::{stdlib, BinaryOp, Member, Method, ObjectType, Param, Scope, Ty, Value};
use pretty_assertions::assert_eq;

use super::*;

fn foo_type() -> ObjectType {
    ObjectType::new("Foo")
}

#[test]
fn test_captured_local_formats_as_bare_name() {
    let scope = Scope::new();
    let foo = scope.bind("foo", Value::Null);
    assert_eq!(ExpressionFormatter::new().format(&foo), "foo");
}

#[test]
fn test_member_chain() {
    let scope = Scope::new();
    let foo = scope.bind("foo", Value::Null);
    let bar = Member::field(&foo_type(), "Bar", Ty::Any);
    let baz = Member::field(&foo_type(), "Baz", Ty::Int);
    let node = Node::member(Node::member(foo, bar), baz);
    assert_eq!(ExpressionFormatter::new().format(&node), "foo.Bar.Baz");
}

#[test]
fn test_static_member_uses_declaring_type() {
    let level = Member::static_cell("Config", "Level", Ty::Int, Value::Int(1));
    let node = Node::static_member(level);
    assert_eq!(ExpressionFormatter::new().format(&node), "Config.Level");
    assert_eq!(ExpressionFormatter::with_context("Config").format(&node), "Level");
}

#[test]
fn test_method_call() {
    let scope = Scope::new();
    let name = scope.bind("name", "hello");
    let node = Node::call(name, stdlib::contains(), vec![Node::constant("ell")]);
    assert_eq!(
        ExpressionFormatter::new().format(&node),
        r#"name.contains("ell")"#
    );
}

#[test]
fn test_static_call() {
    let max = Method::function(
        "Math",
        "max",
        vec![Param::new("a", Ty::Int), Param::new("b", Ty::Int)],
        Ty::Int,
        |_| Ok(Value::Int(0)),
    );
    let node = Node::static_call(max, vec![Node::constant(1), Node::constant(2)]);
    assert_eq!(ExpressionFormatter::new().format(&node), "Math.max(1, 2)");
}

#[test]
fn test_equality_operators() {
    let formatter = ExpressionFormatter::new();
    let eq = Node::eq(Node::constant(1), Node::constant(2));
    let ne = Node::ne(Node::constant("a"), Node::constant(Value::Null));
    assert_eq!(formatter.format(&eq), "1 == 2");
    assert_eq!(formatter.format(&ne), r#""a" != null"#);
}

#[test]
fn test_array_length() {
    let scope = Scope::new();
    let items = scope.bind("items", Value::array(vec![Value::Int(1)]));
    let node = Node::eq(Node::length(items), Node::constant(1));
    assert_eq!(ExpressionFormatter::new().format(&node), "items.Length == 1");
}

#[test]
fn test_lambda() {
    let x = Node::parameter("x", Ty::Int);
    let y = Node::parameter("y", Ty::Int);
    let body = Node::binary(BinaryOp::Add, x.clone(), y.clone());
    let node = Node::lambda(vec![x, y], body);
    assert_eq!(ExpressionFormatter::new().format(&node), "(x, y) => x + y");

    let thunk = Node::thunk(Node::constant(true));
    assert_eq!(ExpressionFormatter::new().format(&thunk), "() => true");
}

#[test]
fn test_precedence_parentheses() {
    let formatter = ExpressionFormatter::new();
    let sum = Node::binary(BinaryOp::Add, Node::constant(1), Node::constant(2));
    let product = Node::binary(BinaryOp::Mul, sum.clone(), Node::constant(3));
    assert_eq!(formatter.format(&product), "(1 + 2) * 3");

    let nested = Node::binary(BinaryOp::Sub, Node::constant(1), sum.clone());
    assert_eq!(formatter.format(&nested), "1 - (1 + 2)");

    let left = Node::binary(BinaryOp::Sub, sum, Node::constant(4));
    assert_eq!(formatter.format(&left), "1 + 2 - 4");
}

#[test]
fn test_not() {
    let formatter = ExpressionFormatter::new();
    let scope = Scope::new();
    let done = scope.bind("done", false);
    assert_eq!(formatter.format(&Node::not(done)), "!done");
    let eq = Node::eq(Node::constant(1), Node::constant(2));
    assert_eq!(formatter.format(&Node::not(eq)), "!(1 == 2)");
}

#[test]
fn test_convert_index_and_new() {
    let formatter = ExpressionFormatter::new();
    let scope = Scope::new();
    let value = scope.bind("value", 2);
    let convert = Node::eq(Node::convert(value, Ty::Float), Node::constant(2.0));
    assert_eq!(formatter.format(&convert), "(float)value == 2.0");

    let items = scope.bind("items", Value::array(vec![Value::Int(1)]));
    assert_eq!(formatter.format(&Node::index(items, Node::constant(0))), "items[0]");

    let point = Node::construct(Ty::Object(ObjectType::new("Point")), vec![Node::constant(1)]);
    assert_eq!(formatter.format(&point), "new Point(1)");
}

#[test]
fn test_conditional_and_invoke() {
    let formatter = ExpressionFormatter::new();
    let scope = Scope::new();
    let callback = scope.bind("callback", Value::Null);
    let call = Node::invoke(callback, vec![Node::constant(1)]);
    assert_eq!(formatter.format(&call), "callback(1)");

    let conditional = Node::conditional(
        Node::constant(true),
        Node::constant(1),
        Node::constant(2),
    );
    assert_eq!(formatter.format(&conditional), "true ? 1 : 2");
}

#[test]
fn test_quote_formats_inner() {
    let inner = Node::eq(Node::constant(1), Node::constant(1));
    assert_eq!(ExpressionFormatter::new().format(&Node::quote(inner)), "1 == 1");
}
