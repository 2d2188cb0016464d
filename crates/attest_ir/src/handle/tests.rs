use super::*;
use crate::value::Object;

#[test]
fn test_field_reads_and_writes_object() {
    let ty = ObjectType::new("Foo");
    let bar = Member::field(&ty, "bar", Ty::Int);
    let foo = Value::Object(Object::new(ty).field("bar", 1));

    assert_eq!(bar.get(Some(&foo)).ok(), Some(Value::Int(1)));
    assert!(bar.set(Some(&foo), Value::Int(2)).is_ok());
    assert_eq!(bar.get(Some(&foo)).ok(), Some(Value::Int(2)));
}

#[test]
fn test_missing_field_reads_null() {
    let ty = ObjectType::new("Foo");
    let bar = Member::field(&ty, "bar", Ty::Str);
    let foo = Value::Object(Object::new(ty));
    assert_eq!(bar.get(Some(&foo)).ok(), Some(Value::Null));
}

#[test]
fn test_field_rejects_non_object_target() {
    let bar = Member::field(&ObjectType::new("Foo"), "bar", Ty::Int);
    let error = bar.get(Some(&Value::Int(1))).err();
    assert!(error.is_some_and(|e| e.is_instance_of(&crate::error_types::invalid_operation())));
}

#[test]
fn test_static_cell_round_trips() {
    let cell = Member::static_cell("Config", "level", Ty::Int, Value::Int(0));
    assert!(cell.is_static());
    assert!(cell.set(None, Value::Int(42)).is_ok());
    assert_eq!(cell.get(None).ok(), Some(Value::Int(42)));
}

#[test]
fn test_property_is_read_only() {
    let len = crate::stdlib::len();
    assert!(!len.is_writable());
    assert_eq!(len.get(Some(&Value::string("héllo"))).ok(), Some(Value::Int(5)));
    assert!(len.set(Some(&Value::string("x")), Value::Int(1)).is_err());
}

#[test]
fn test_method_writes_out_params() {
    let try_parse = Method::function(
        "Parser",
        "try_parse",
        vec![Param::new("text", Ty::Str), Param::out("result", Ty::Int)],
        Ty::Bool,
        |args| {
            let parsed = args[0].as_str().and_then(|s| s.parse::<i64>().ok());
            match parsed {
                Some(n) => {
                    args[1] = Value::Int(n);
                    Ok(Value::Bool(true))
                }
                None => Ok(Value::Bool(false)),
            }
        },
    );
    let mut args = vec![Value::string("42"), Value::Null];
    assert!(try_parse.has_out_params());
    assert_eq!(try_parse.invoke(None, &mut args).ok(), Some(Value::Bool(true)));
    assert_eq!(args[1], Value::Int(42));
}

#[test]
fn test_method_checks_argument_count() {
    let contains = crate::stdlib::contains();
    let target = Value::string("abc");
    assert!(contains.invoke(Some(&target), &mut []).is_err());
    assert_eq!(
        contains.invoke(Some(&target), &mut [Value::string("b")]).ok(),
        Some(Value::Bool(true))
    );
}

#[test]
fn test_method_keys_identify_signatures() {
    assert_eq!(crate::stdlib::ends_with().key(), crate::stdlib::ends_with().key());
    assert_ne!(
        crate::stdlib::ends_with().key(),
        crate::stdlib::ends_with_case().key()
    );
}

#[test]
fn test_ends_with_ignoring_case() {
    let ends_with = crate::stdlib::ends_with_case();
    let target = Value::string("Hello World");
    let mut args = [Value::string("WORLD"), Value::Bool(true)];
    assert_eq!(ends_with.invoke(Some(&target), &mut args).ok(), Some(Value::Bool(true)));
    let mut args = [Value::string("WORLD"), Value::Bool(false)];
    assert_eq!(ends_with.invoke(Some(&target), &mut args).ok(), Some(Value::Bool(false)));
}
