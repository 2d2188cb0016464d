use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use attest_ir::{Object, ObjectType};

use super::*;

#[test]
fn test_int_to_float() {
    let cache = ConversionCache::new();
    assert_eq!(
        cache.convert(&Ty::Int, &Ty::Float, Value::Int(2)).ok(),
        Some(Value::Float(2.0))
    );
}

#[test]
fn test_float_to_int_truncates() {
    let cache = ConversionCache::new();
    assert_eq!(
        cache.convert(&Ty::Float, &Ty::Int, Value::Float(2.9)).ok(),
        Some(Value::Int(2))
    );
    let error = cache.convert(&Ty::Float, &Ty::Int, Value::Float(f64::INFINITY)).err();
    assert!(error.is_some_and(|e| e.is_instance_of(&error_types::overflow())));
}

#[test]
fn test_null_to_value_type_fails() {
    let cache = ConversionCache::new();
    let error = cache.convert(&Ty::Any, &Ty::Int, Value::Null).err();
    assert!(error.is_some_and(|e| e.is_instance_of(&error_types::null_reference())));
}

#[test]
fn test_reference_conversions() {
    let base = ObjectType::new("Animal");
    let derived = ObjectType::derived("Dog", &base);
    let dog = Value::Object(Object::new(derived.clone()));
    let cache = ConversionCache::new();

    let up = cache.convert(&Ty::Object(derived.clone()), &Ty::Object(base.clone()), dog.clone());
    assert_eq!(up.ok(), Some(dog));

    let animal = Value::Object(Object::new(base.clone()));
    let down = cache.convert(&Ty::Object(base), &Ty::Object(derived), animal).err();
    assert!(down.is_some_and(|e| e.is_instance_of(&error_types::invalid_cast())));

    assert_eq!(
        cache.convert(&Ty::Any, &Ty::Str, Value::Null).ok(),
        Some(Value::Null)
    );
}

#[test]
fn test_each_pair_built_once() {
    let cache = ConversionCache::new();
    for n in 0..10 {
        assert!(cache.convert(&Ty::Int, &Ty::Float, Value::Int(n)).is_ok());
        assert!(cache.convert(&Ty::Float, &Ty::Int, Value::Float(1.5)).is_ok());
    }
    assert_eq!(cache.builds(), 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_custom_builder_is_used() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let cache = ConversionCache::with_builder(move |from, to| {
        seen.fetch_add(1, Ordering::SeqCst);
        build_conversion(from, to)
    });
    assert!(cache.is_empty());
    let _ = cache.get(&Ty::Int, &Ty::Float);
    let _ = cache.get(&Ty::Int, &Ty::Float);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_lookups_build_once() {
    let cache = Arc::new(ConversionCache::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                for n in 0..100 {
                    let _ = cache.convert(&Ty::Int, &Ty::Float, Value::Int(n));
                }
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().is_ok());
    }
    assert_eq!(cache.builds(), 1);
}
