//! Method phrasings.
//!
//! A phrasing turns the arguments of a known method into a natural
//! description of what was expected, so `name.contains("x")` fails with
//! "Expected: a string containing \"x\"" instead of "Expected: true".
//! Phrasings are registered by method signature; they never change whether
//! the check passes.

use std::fmt;
use std::sync::Arc;

use attest_fmt::ValueFormatter;
use attest_ir::{stdlib, Method, MethodKey, Value};
use rustc_hash::FxHashMap;

/// Describes the expected outcome from the call's arguments.
pub type Phrasing = Arc<dyn Fn(&[Value], &ValueFormatter) -> String + Send + Sync>;

/// Registry mapping method signatures to phrasings.
#[derive(Clone, Default)]
pub struct MethodPhrasings {
    entries: FxHashMap<MethodKey, Phrasing>,
}

impl MethodPhrasings {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in string phrasings.
    pub fn with_defaults() -> Self {
        let mut phrasings = Self::new();
        register_string_phrasings(&mut phrasings);
        phrasings
    }

    pub fn register(
        &mut self,
        method: &Method,
        phrasing: impl Fn(&[Value], &ValueFormatter) -> String + Send + Sync + 'static,
    ) {
        self.entries.insert(method.key(), Arc::new(phrasing));
    }

    pub fn get(&self, method: &Method) -> Option<&Phrasing> {
        self.entries.get(&method.key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for MethodPhrasings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

fn first_arg(args: &[Value], values: &ValueFormatter) -> String {
    args.first().map_or_else(String::new, |arg| values.format(arg))
}

fn register_string_phrasings(phrasings: &mut MethodPhrasings) {
    phrasings.register(&stdlib::contains(), |args, values| {
        format!("a string containing {}", first_arg(args, values))
    });
    phrasings.register(&stdlib::starts_with(), |args, values| {
        format!("a string starting with {}", first_arg(args, values))
    });
    phrasings.register(&stdlib::ends_with(), |args, values| {
        format!("a string ending with {}", first_arg(args, values))
    });
    phrasings.register(&stdlib::ends_with_case(), |args, values| {
        let ignore_case = args.get(1).and_then(Value::as_bool).unwrap_or(false);
        let comparison = if ignore_case { "ignore case" } else { "match case" };
        format!(
            "a string ending with {} using '{comparison}'",
            first_arg(args, values)
        )
    });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_string_phrasings() {
        let phrasings = MethodPhrasings::with_defaults();
        let values = ValueFormatter::new();
        let args = [Value::string("x")];

        let contains = phrasings.get(&stdlib::contains());
        assert_eq!(
            contains.map(|p| p(&args, &values)),
            Some("a string containing \"x\"".to_string())
        );
        let starts = phrasings.get(&stdlib::starts_with());
        assert_eq!(
            starts.map(|p| p(&args, &values)),
            Some("a string starting with \"x\"".to_string())
        );
        let ends = phrasings.get(&stdlib::ends_with_case());
        assert_eq!(
            ends.map(|p| p(&[Value::string("x"), Value::Bool(true)], &values)),
            Some("a string ending with \"x\" using 'ignore case'".to_string())
        );
        assert_eq!(phrasings.len(), 4);
    }

    #[test]
    fn test_unknown_methods_have_no_phrasing() {
        let phrasings = MethodPhrasings::with_defaults();
        let other = Method::function("Math", "is_even", Vec::new(), attest_ir::Ty::Bool, |_| {
            Ok(Value::Bool(true))
        });
        assert!(phrasings.get(&other).is_none());
        assert!(MethodPhrasings::new().is_empty());
    }
}
