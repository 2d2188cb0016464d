//! Evaluator configuration.

/// How the interpreter treats `<`, `<=`, `>` and `>=` without a user-defined
/// operator.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RelationalPolicy {
    /// The expression is handed to the compiled fallback, which compares
    /// with the natural ordering but loses fault attribution.
    #[default]
    Unsupported,
    /// The interpreter compares with the natural ordering of numbers,
    /// strings and booleans, keeping fault attribution.
    DefaultOrdering,
}

/// Evaluator configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalConfig {
    pub relational: RelationalPolicy,
}

impl EvalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_relational(mut self, relational: RelationalPolicy) -> Self {
        self.relational = relational;
        self
    }
}
