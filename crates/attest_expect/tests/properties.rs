//! Property-based tests for assertions.
//!
//! 1. `a == a` holds for any evaluable `a`.
//! 2. Negation inverts the outcome and keeps the expression text.

#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    reason = "Proptest macros generate code with these patterns"
)]

use attest_expect::Verifier;
use attest_fmt::ExpressionFormatter;
use attest_ir::{Node, Scope, Value};
use proptest::prelude::*;

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        prop::num::f64::ANY.prop_map(Value::Float),
        Just(Value::Float(f64::NAN)),
        ".{0,12}".prop_map(Value::from),
        prop::collection::vec(any::<i32>().prop_map(Value::from), 0..4).prop_map(Value::from),
        prop::collection::vec(prop::num::f64::ANY.prop_map(Value::Float), 0..4)
            .prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn self_equality_always_holds(value in value_strategy()) {
        let scope = Scope::new();
        let a = scope.bind("a", value);
        let node = Node::eq(a.clone(), a);
        prop_assert!(Verifier::new().that(&node).is_ok());
    }

    #[test]
    fn negation_inverts_and_keeps_text(left in any::<i64>(), right in any::<i64>()) {
        let verifier = Verifier::new();
        let formatter = ExpressionFormatter::new();
        let scope = Scope::new();
        let inner = Node::eq(scope.bind("left", left), Node::constant(right));

        let plain = verifier.bind(&inner);
        let negated = verifier.bind(&Node::not(inner));
        let (Ok(plain), Ok(negated)) = (plain, negated) else {
            return Err(TestCaseError::fail("comparison should bind"));
        };
        prop_assert_eq!(negated.check(), !plain.check());
        prop_assert_eq!(negated.check(), left != right);
        prop_assert_eq!(
            negated.format_expression(&formatter),
            plain.format_expression(&formatter)
        );
    }
}
