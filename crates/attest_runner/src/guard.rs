//! Panic containment for user code.

use std::panic::{self, AssertUnwindSafe};

use attest_ir::Raised;

/// Runs user code, turning a panic into a `Panic` error.
pub(crate) fn guarded<T>(f: impl FnOnce() -> Result<T, Raised>) -> Result<T, Raised> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(Raised::from_panic(payload.as_ref())),
    }
}
