use attest_ir::{Node, Object, ObjectType};
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_format_scalars() {
    let values = ValueFormatter::new();
    assert_eq!(values.format(&Value::Null), "null");
    assert_eq!(values.format(&Value::Bool(true)), "true");
    assert_eq!(values.format(&Value::Int(-42)), "-42");
    assert_eq!(values.format(&Value::Float(2.0)), "2.0");
    assert_eq!(values.format(&Value::Float(0.5)), "0.5");
}

#[test]
fn test_format_strings_quoted_and_escaped() {
    let values = ValueFormatter::new();
    assert_eq!(values.format(&Value::string("hello")), "\"hello\"");
    assert_eq!(
        values.format(&Value::string("say \"hi\"\n")),
        r#""say \"hi\"\n""#
    );
}

#[test]
fn test_format_arrays() {
    let values = ValueFormatter::new();
    let array = Value::array(vec![Value::Int(1), Value::string("a"), Value::Null]);
    assert_eq!(values.format(&array), r#"[1, "a", null]"#);
    assert_eq!(values.format(&Value::array(Vec::new())), "[]");
}

#[test]
fn test_format_objects_sorted_by_field() {
    let values = ValueFormatter::new();
    let point = Object::new(ObjectType::new("Point")).field("y", 2).field("x", 1);
    assert_eq!(values.format(&Value::Object(point)), "Point { x: 1, y: 2 }");
    let empty = Object::new(ObjectType::new("Empty"));
    assert_eq!(values.format(&Value::Object(empty)), "Empty");
}

#[test]
fn test_format_quoted_expression() {
    let values = ValueFormatter::new();
    let node = Node::eq(Node::constant(1), Node::constant(2));
    assert_eq!(values.format(&Value::Expr(node)), "1 == 2");
}

#[test]
fn test_format_all() {
    let values = ValueFormatter::new();
    assert_eq!(
        values.format_all(&[Value::Int(1), Value::string("two")]),
        r#"1, "two""#
    );
    assert_eq!(values.format_all(&[]), "");
}

#[test]
fn test_format_cyclic_objects() {
    let values = ValueFormatter::new();
    let node = Object::new(ObjectType::new("TreeNode")).field("id", 1);
    node.set("parent", Value::Object(node.clone()));
    assert_eq!(
        values.format(&Value::Object(node)),
        "TreeNode { id: 1, parent: TreeNode { .. } }"
    );
}

#[test]
fn test_format_shared_objects_in_full() {
    let values = ValueFormatter::new();
    let leaf = Object::new(ObjectType::new("Leaf")).field("id", 7);
    let pair = Value::array(vec![Value::Object(leaf.clone()), Value::Object(leaf)]);
    assert_eq!(values.format(&pair), "[Leaf { id: 7 }, Leaf { id: 7 }]");
}
