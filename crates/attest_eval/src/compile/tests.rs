use attest_ir::{Param, Scope};

use super::*;

fn run_default(node: &Node) -> Result<Value, Raised> {
    run(node, &Arc::new(ConversionCache::new()))
}

#[test]
fn test_arithmetic() {
    let sum = Node::binary(BinaryOp::Add, Node::constant(2), Node::constant(3));
    let product = Node::binary(BinaryOp::Mul, sum, Node::constant(1.5));
    assert_eq!(run_default(&product).ok(), Some(Value::Float(7.5)));

    let concat = Node::binary(BinaryOp::Add, Node::constant("a"), Node::constant("b"));
    assert_eq!(run_default(&concat).ok(), Some(Value::string("ab")));
}

#[test]
fn test_integer_errors() {
    let div = Node::binary(BinaryOp::Div, Node::constant(1), Node::constant(0));
    let error = run_default(&div).err();
    assert!(error.is_some_and(|e| e.is_instance_of(&error_types::divide_by_zero())));

    let overflow = Node::binary(BinaryOp::Add, Node::constant(i64::MAX), Node::constant(1));
    let error = run_default(&overflow).err();
    assert!(error.is_some_and(|e| e.is_instance_of(&error_types::overflow())));
}

#[test]
fn test_logical_operators_short_circuit() {
    let scope = Scope::new();
    let missing = scope.declare("missing", Ty::Str, Value::Null);
    let explode = Node::eq(Node::member(missing, attest_ir::stdlib::len()), Node::constant(0));

    let and = Node::binary(BinaryOp::And, Node::constant(false), explode.clone());
    assert_eq!(run_default(&and).ok(), Some(Value::Bool(false)));
    let or = Node::binary(BinaryOp::Or, Node::constant(true), explode.clone());
    assert_eq!(run_default(&or).ok(), Some(Value::Bool(true)));

    let error = run_default(&Node::binary(BinaryOp::Or, Node::constant(false), explode)).err();
    assert!(error.is_some_and(|e| e.is_instance_of(&error_types::null_reference())));
}

#[test]
fn test_lambda_with_parameters_is_callable() {
    let x = Node::parameter("x", Ty::Int);
    let y = Node::parameter("y", Ty::Int);
    let add = Node::lambda(
        vec![x.clone(), y.clone()],
        Node::binary(BinaryOp::Add, x, y),
    );
    let call = Node::invoke(add, vec![Node::constant(2), Node::constant(40)]);
    assert_eq!(run_default(&call).ok(), Some(Value::Int(42)));
}

#[test]
fn test_lambda_captures_enclosing_parameters() {
    let x = Node::parameter("x", Ty::Int);
    let y = Node::parameter("y", Ty::Int);
    let inner = Node::lambda(vec![y.clone()], Node::binary(BinaryOp::Sub, x.clone(), y));
    let outer = Node::lambda(vec![x], Node::invoke(inner, vec![Node::constant(1)]));
    let call = Node::invoke(outer, vec![Node::constant(10)]);
    assert_eq!(run_default(&call).ok(), Some(Value::Int(9)));
}

#[test]
fn test_unbound_parameter() {
    let error = run_default(&Node::parameter("x", Ty::Int)).err();
    assert!(error.is_some_and(|e| e.is_instance_of(&error_types::invalid_operation())));
}

#[test]
fn test_not_and_conditional() {
    let not = Node::not(Node::eq(Node::constant(1), Node::constant(2)));
    assert_eq!(run_default(&not).ok(), Some(Value::Bool(true)));

    let pick = Node::conditional(Node::constant(false), Node::constant("a"), Node::constant("b"));
    assert_eq!(run_default(&pick).ok(), Some(Value::string("b")));
}

#[test]
fn test_array_length() {
    let scope = Scope::new();
    let items = scope.bind("items", Value::array(vec![Value::Int(1), Value::Int(2)]));
    assert_eq!(run_default(&Node::length(items)).ok(), Some(Value::Int(2)));

    let missing = scope.declare("missing", Ty::Array, Value::Null);
    let error = run_default(&Node::length(missing)).err();
    assert!(error.is_some_and(|e| e.is_instance_of(&error_types::null_reference())));
}

#[test]
fn test_out_parameters_in_compiled_code() {
    let double = Method::function(
        "Math",
        "double",
        vec![Param::new("x", Ty::Int), Param::out("result", Ty::Int)],
        Ty::Bool,
        |args| {
            let x = args[0].as_int().unwrap_or_default();
            args[1] = Value::Int(x * 2);
            Ok(Value::Bool(true))
        },
    );
    let scope = Scope::new();
    let result = scope.declare("result", Ty::Int, Value::Int(0));
    let call = Node::static_call(double, vec![Node::constant(21), result]);
    let check = Node::binary(BinaryOp::And, call, Node::constant(true));
    assert_eq!(run_default(&check).ok(), Some(Value::Bool(true)));
    assert_eq!(scope.get("result"), Value::Int(42));
}

#[test]
fn test_order() {
    assert_eq!(
        order(BinaryOp::GtEq, &Value::Int(2), &Value::Float(2.0)).ok(),
        Some(Value::Bool(true))
    );
    assert!(order(BinaryOp::Lt, &Value::Int(1), &Value::string("x")).is_err());
}
