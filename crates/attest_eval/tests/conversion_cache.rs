//! Conversion cache scenarios across many evaluations.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use attest_eval::{build_conversion, ConversionCache, Evaluator};
use attest_ir::{Node, Scope, Ty, Value};
use parking_lot::Mutex;

/// A cache that records every `(from, to)` pair it is asked to build.
fn recording_cache() -> (Arc<ConversionCache>, Arc<Mutex<Vec<(Ty, Ty)>>>) {
    let built = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&built);
    let cache = ConversionCache::with_builder(move |from, to| {
        log.lock().push((from.clone(), to.clone()));
        build_conversion(from, to)
    });
    (Arc::new(cache), built)
}

#[test]
fn int_to_float_conversion_is_built_once() {
    let (cache, built) = recording_cache();
    let evaluator = Evaluator::new().with_conversions(Arc::clone(&cache));

    let scope = Scope::new();
    let int_value = scope.bind("intValue", 2);
    let check = Node::eq(Node::convert(int_value, Ty::Float), Node::constant(2.0));

    for _ in 0..100 {
        assert_eq!(evaluator.evaluate(&check).unwrap(), Value::Bool(true));
    }

    assert_eq!(*built.lock(), vec![(Ty::Int, Ty::Float)]);
    assert_eq!(cache.builds(), 1);
}

#[test]
fn each_type_pair_gets_its_own_conversion() {
    let (cache, built) = recording_cache();
    let evaluator = Evaluator::new().with_conversions(cache);

    let to_float = Node::convert(Node::constant(3), Ty::Float);
    let to_int = Node::convert(Node::constant(3.7), Ty::Int);
    for _ in 0..10 {
        assert_eq!(evaluator.evaluate(&to_float).unwrap(), Value::Float(3.0));
        assert_eq!(evaluator.evaluate(&to_int).unwrap(), Value::Int(3));
    }

    assert_eq!(built.lock().len(), 2);
}

#[test]
fn evaluators_sharing_a_cache_share_conversions() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let cache = Arc::new(ConversionCache::with_builder(move |from, to| {
        counted.fetch_add(1, Ordering::SeqCst);
        build_conversion(from, to)
    }));

    let check = Node::eq(Node::convert(Node::constant(2), Ty::Float), Node::constant(2.0));
    std::thread::scope(|s| {
        for _ in 0..4 {
            let evaluator = Evaluator::new().with_conversions(Arc::clone(&cache));
            let check = check.clone();
            s.spawn(move || {
                for _ in 0..50 {
                    assert_eq!(evaluator.evaluate(&check).unwrap(), Value::Bool(true));
                }
            });
        }
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
