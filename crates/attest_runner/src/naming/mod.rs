//! Display names for tests.

use std::sync::LazyLock;

use attest_fmt::ValueFormatter;
use attest_ir::Value;
use regex::{Captures, Regex};

/// Turns a test's base name and row arguments into a display name.
///
/// Names label reports only; they are never used to identify a test.
pub trait TestNamer: Send + Sync {
    fn name_for(&self, base: &str, args: Option<&[Value]>) -> String;
}

#[expect(clippy::expect_used, reason = "patterns are literals")]
fn literal(pattern: &str) -> Regex {
    Regex::new(pattern).expect("literal pattern is valid")
}

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| literal(r"_|\+"));
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| literal(r"\{(\d+)\}"));

/// Underscores become spaces. Row arguments fill `{0}`-style placeholders
/// when the base name has any, and are appended as `name(a, b)` otherwise.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultNamer {
    values: ValueFormatter,
}

impl DefaultNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `base` with separators replaced by spaces.
    pub fn normalize(base: &str) -> String {
        SEPARATORS.replace_all(base, " ").into_owned()
    }
}

impl TestNamer for DefaultNamer {
    fn name_for(&self, base: &str, args: Option<&[Value]>) -> String {
        let Some(args) = args else {
            return Self::normalize(base);
        };
        let base = Self::normalize(base);
        if PLACEHOLDER.is_match(&base) {
            return PLACEHOLDER
                .replace_all(&base, |caps: &Captures<'_>| {
                    caps[1]
                        .parse::<usize>()
                        .ok()
                        .and_then(|index| args.get(index))
                        .map_or_else(|| caps[0].to_string(), |arg| self.values.format(arg))
                })
                .into_owned();
        }
        format!("{base}({})", self.values.format_all(args))
    }
}
