//! Conversion function cache.
//!
//! A `Convert` node without a user-defined operator converts through a
//! generic function built once per ordered `(source, target)` type pair.
//! Entries are immutable once inserted; insertion happens under the write
//! lock after a second lookup, so each pair is built exactly once even when
//! many evaluations race on it.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use attest_ir::{error_types, Raised, Ty, Value};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// A built conversion.
pub type ConversionFn = Arc<dyn Fn(Value) -> Result<Value, Raised> + Send + Sync>;

/// Builds the conversion for a `(source, target)` pair.
pub type ConversionBuilder = Arc<dyn Fn(&Ty, &Ty) -> ConversionFn + Send + Sync>;

/// Shared cache of conversion functions keyed by type pair.
pub struct ConversionCache {
    entries: RwLock<FxHashMap<(Ty, Ty), ConversionFn>>,
    builder: ConversionBuilder,
    builds: AtomicUsize,
}

impl ConversionCache {
    /// A cache using the generic numeric/reference conversions.
    pub fn new() -> Self {
        Self::with_builder(build_conversion)
    }

    /// A cache with a custom builder, e.g. one that records invocations.
    pub fn with_builder(
        builder: impl Fn(&Ty, &Ty) -> ConversionFn + Send + Sync + 'static,
    ) -> Self {
        ConversionCache {
            entries: RwLock::new(FxHashMap::default()),
            builder: Arc::new(builder),
            builds: AtomicUsize::new(0),
        }
    }

    /// The conversion for `from -> to`, building and caching it on first use.
    pub fn get(&self, from: &Ty, to: &Ty) -> ConversionFn {
        let key = (from.clone(), to.clone());
        if let Some(conversion) = self.entries.read().get(&key) {
            return Arc::clone(conversion);
        }

        let mut entries = self.entries.write();
        if let Some(conversion) = entries.get(&key) {
            return Arc::clone(conversion);
        }
        tracing::trace!(%from, %to, "building conversion");
        let conversion = (self.builder)(from, to);
        self.builds.fetch_add(1, Ordering::Relaxed);
        entries.insert(key, Arc::clone(&conversion));
        conversion
    }

    /// Converts `value` from `from` to `to`.
    pub fn convert(&self, from: &Ty, to: &Ty, value: Value) -> Result<Value, Raised> {
        self.get(from, to)(value)
    }

    /// Number of conversion functions built so far.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    /// Number of cached type pairs.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for ConversionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConversionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionCache")
            .field("entries", &self.len())
            .field("builds", &self.builds())
            .finish_non_exhaustive()
    }
}

/// The generic conversion from `from` to `to`.
///
/// Numbers convert between `int` and `float` (float to int truncates and
/// raises `Overflow` when out of range). Reference conversions pass `null`
/// and values of a compatible type through unchanged. Everything else
/// raises `InvalidCast`.
pub fn build_conversion(from: &Ty, to: &Ty) -> ConversionFn {
    if from == to || *to == Ty::Any {
        return Arc::new(Ok::<Value, Raised>);
    }
    let from = from.clone();
    let to = to.clone();
    Arc::new(move |value| convert_value(value, &from, &to))
}

#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    reason = "numeric conversions follow the usual widening and truncating casts"
)]
fn convert_value(value: Value, from: &Ty, to: &Ty) -> Result<Value, Raised> {
    match (value, to) {
        (Value::Int(n), Ty::Float) => Ok(Value::Float(n as f64)),
        (Value::Float(x), Ty::Int) => {
            let truncated = x.trunc();
            if truncated.is_finite()
                && truncated >= i64::MIN as f64
                && truncated < i64::MAX as f64
            {
                Ok(Value::Int(truncated as i64))
            } else {
                Err(Raised::new(
                    error_types::overflow(),
                    format!("{x} does not fit in int"),
                ))
            }
        }
        (Value::Null, to) if !to.is_nullable() => Err(Raised::null_reference(format!(
            "cannot convert null to {to}"
        ))),
        (value, to) if value.is_instance_of(to) => Ok(value),
        (value, to) => Err(Raised::invalid_cast(format!(
            "cannot convert {} (declared {from}) to {to}",
            value.ty()
        ))),
    }
}

#[cfg(test)]
mod tests;
