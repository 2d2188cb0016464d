//! Errors raised by user code, the evaluator and failed assertions.
//!
//! A `Raised` is the value-level equivalent of a thrown exception: a typed
//! error (see [`error_types`]) plus a message. Errors raised by user handles
//! travel through evaluation unchanged, so an expected-error assertion sees
//! the user's own error type.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::node::Node;
use crate::ty::ObjectType;

/// A null sub-expression found during evaluation.
///
/// `offender` is the minimal sub-expression that evaluated to null; `context`
/// is the expression being evaluated when the null surfaced.
#[derive(Clone, Debug)]
pub struct Fault {
    pub context: Node,
    pub offender: Node,
}

impl Fault {
    pub fn new(context: Node, offender: Node) -> Self {
        Fault { context, offender }
    }
}

struct RaisedData {
    ty: ObjectType,
    message: String,
    fault: Option<Fault>,
}

/// A raised error.
#[derive(Clone)]
pub struct Raised(Arc<RaisedData>);

impl Raised {
    pub fn new(ty: ObjectType, message: impl Into<String>) -> Self {
        Raised(Arc::new(RaisedData {
            ty,
            message: message.into(),
            fault: None,
        }))
    }

    // Factory Methods

    #[cold]
    pub fn assertion_failed(message: impl Into<String>) -> Self {
        Raised::new(error_types::assertion_failed(), message)
    }

    #[cold]
    pub fn null_reference(message: impl Into<String>) -> Self {
        Raised::new(error_types::null_reference(), message)
    }

    /// A fault promoted to an error, keeping the nodes for inspection.
    #[cold]
    pub fn null_subexpression(fault: Fault, message: impl Into<String>) -> Self {
        Raised(Arc::new(RaisedData {
            ty: error_types::null_subexpression(),
            message: message.into(),
            fault: Some(fault),
        }))
    }

    #[cold]
    pub fn invalid_cast(message: impl Into<String>) -> Self {
        Raised::new(error_types::invalid_cast(), message)
    }

    #[cold]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Raised::new(error_types::invalid_operation(), message)
    }

    #[cold]
    pub fn not_supported(message: impl Into<String>) -> Self {
        Raised::new(error_types::not_supported(), message)
    }

    #[cold]
    pub fn index_out_of_range(index: i64, len: usize) -> Self {
        Raised::new(
            error_types::index_out_of_range(),
            format!("index {index} is out of range for length {len}"),
        )
    }

    #[cold]
    pub fn panic(message: impl Into<String>) -> Self {
        Raised::new(error_types::panic(), message)
    }

    /// A `Panic` error carrying the message of a caught panic payload.
    #[cold]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else {
            "unknown panic".to_string()
        };
        Raised::panic(message)
    }

    // Accessors

    pub fn ty(&self) -> &ObjectType {
        &self.0.ty
    }

    pub fn message(&self) -> &str {
        &self.0.message
    }

    pub fn fault(&self) -> Option<&Fault> {
        self.0.fault.as_ref()
    }

    /// Whether this error's type is `ty` or derives from it.
    pub fn is_instance_of(&self, ty: &ObjectType) -> bool {
        self.0.ty.is_subtype_of(ty)
    }
}

impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.message.is_empty() {
            write!(f, "{}", self.0.ty)
        } else {
            write!(f, "{}: {}", self.0.ty, self.0.message)
        }
    }
}

impl fmt::Debug for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raised")
            .field("ty", &self.0.ty.name())
            .field("message", &self.0.message)
            .finish_non_exhaustive()
    }
}

impl std::error::Error for Raised {}

/// Built-in error type hierarchy.
///
/// ```text
/// Exception
/// ├── AssertionFailed
/// ├── NullReference
/// ├── Argument
/// │   └── ArgumentNull
/// │       └── NullSubexpression
/// ├── InvalidCast
/// ├── InvalidOperation
/// ├── NotSupported
/// ├── IndexOutOfRange
/// ├── Overflow
/// ├── DivideByZero
/// └── Panic
/// ```
pub mod error_types {
    use std::sync::LazyLock;

    use crate::ty::ObjectType;

    static EXCEPTION: LazyLock<ObjectType> = LazyLock::new(|| ObjectType::new("Exception"));
    static ARGUMENT: LazyLock<ObjectType> =
        LazyLock::new(|| ObjectType::derived("Argument", &EXCEPTION));
    static ARGUMENT_NULL: LazyLock<ObjectType> =
        LazyLock::new(|| ObjectType::derived("ArgumentNull", &ARGUMENT));

    macro_rules! exception_types {
        ($($fn_name:ident => $name:literal : $base:ident;)*) => {
            $(
                pub fn $fn_name() -> ObjectType {
                    static TY: LazyLock<ObjectType> =
                        LazyLock::new(|| ObjectType::derived($name, &$base()));
                    TY.clone()
                }
            )*
        };
    }

    /// Root of every raised error.
    pub fn exception() -> ObjectType {
        EXCEPTION.clone()
    }

    pub fn argument() -> ObjectType {
        ARGUMENT.clone()
    }

    pub fn argument_null() -> ObjectType {
        ARGUMENT_NULL.clone()
    }

    exception_types! {
        assertion_failed => "AssertionFailed": exception;
        null_reference => "NullReference": exception;
        null_subexpression => "NullSubexpression": argument_null;
        invalid_cast => "InvalidCast": exception;
        invalid_operation => "InvalidOperation": exception;
        not_supported => "NotSupported": exception;
        index_out_of_range => "IndexOutOfRange": exception;
        overflow => "Overflow": exception;
        divide_by_zero => "DivideByZero": exception;
        panic => "Panic": exception;
    }
}
