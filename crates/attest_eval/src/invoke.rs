//! Method invocation with output-parameter write-back.

use attest_ir::{Method, Raised, Value};

/// Invokes `method` and writes every output argument back through
/// `write_back(index, value)`.
///
/// Write-back happens whether or not the call succeeded. An error raised by
/// the call itself takes precedence over a write-back error.
pub(crate) fn invoke_method<E: From<Raised>>(
    method: &Method,
    target: Option<&Value>,
    mut args: Vec<Value>,
    mut write_back: impl FnMut(usize, Value) -> Result<(), E>,
) -> Result<Value, E> {
    let result = method.invoke(target, &mut args).map_err(E::from);
    if !method.has_out_params() {
        return result;
    }
    for (index, (param, value)) in method.params().iter().zip(args).enumerate() {
        if param.out {
            let written = write_back(index, value);
            if result.is_ok() {
                written?;
            }
        }
    }
    result
}
