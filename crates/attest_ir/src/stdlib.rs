//! Built-in handles for string values.
//!
//! These are the handles the default phrasing registry knows about, so
//! `name.contains("x")` fails with "expected a string containing \"x\"".

use std::sync::LazyLock;

use crate::handle::{Member, Method, Param};
use crate::raised::Raised;
use crate::ty::Ty;
use crate::value::Value;

/// Declaring type name of the string handles.
pub const STR: &str = "str";

fn receiver(target: &Value) -> Result<&str, Raised> {
    target
        .as_str()
        .ok_or_else(|| Raised::invalid_operation("string method called on a non-string value"))
}

fn argument(args: &[Value], index: usize) -> Result<&str, Raised> {
    match args.get(index) {
        Some(Value::Str(s)) => Ok(s),
        Some(Value::Null) => Err(Raised::new(
            crate::raised::error_types::argument_null(),
            "string argument is null",
        )),
        _ => Err(Raised::invalid_cast("expected a string argument")),
    }
}

fn string_predicate(name: &'static str, test: fn(&str, &str) -> bool) -> Method {
    Method::instance(
        STR,
        name,
        vec![Param::new("value", Ty::Str)],
        Ty::Bool,
        move |target, args| Ok(Value::Bool(test(receiver(target)?, argument(args, 0)?))),
    )
}

static CONTAINS: LazyLock<Method> =
    LazyLock::new(|| string_predicate("contains", |s, p| s.contains(p)));
static STARTS_WITH: LazyLock<Method> =
    LazyLock::new(|| string_predicate("starts_with", |s, p| s.starts_with(p)));
static ENDS_WITH: LazyLock<Method> =
    LazyLock::new(|| string_predicate("ends_with", |s, p| s.ends_with(p)));

static ENDS_WITH_CASE: LazyLock<Method> = LazyLock::new(|| {
    Method::instance(
        STR,
        "ends_with",
        vec![Param::new("value", Ty::Str), Param::new("ignore_case", Ty::Bool)],
        Ty::Bool,
        |target, args| {
            let s = receiver(target)?;
            let suffix = argument(args, 0)?;
            let ignore_case = args.get(1).and_then(Value::as_bool).unwrap_or(false);
            let ends = if ignore_case {
                s.to_lowercase().ends_with(&suffix.to_lowercase())
            } else {
                s.ends_with(suffix)
            };
            Ok(Value::Bool(ends))
        },
    )
});

static LEN: LazyLock<Member> = LazyLock::new(|| {
    Member::property(STR, "len", Ty::Int, |target| {
        let s = receiver(target)?;
        i64::try_from(s.chars().count())
            .map(Value::Int)
            .map_err(|_| Raised::new(crate::raised::error_types::overflow(), "string too long"))
    })
});

/// `str.contains(value)`.
pub fn contains() -> Method {
    CONTAINS.clone()
}

/// `str.starts_with(value)`.
pub fn starts_with() -> Method {
    STARTS_WITH.clone()
}

/// `str.ends_with(value)`.
pub fn ends_with() -> Method {
    ENDS_WITH.clone()
}

/// `str.ends_with(value, ignore_case)`.
pub fn ends_with_case() -> Method {
    ENDS_WITH_CASE.clone()
}

/// `str.len`, counted in characters.
pub fn len() -> Member {
    LEN.clone()
}
