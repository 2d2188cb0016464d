//! Static and runtime type information.
//!
//! `Ty` is attached to nodes (the declared type of a constant, member or
//! call) and computed from values at runtime. Conversion functions are
//! cached per ordered `(Ty, Ty)` pair, so `Ty` is `Eq + Hash`.
//!
//! `ObjectType` is a nominal type with single inheritance. It is used for
//! user objects and for error types, where "instance of or derived from"
//! decides whether an expected-error assertion holds.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::raised::{error_types, Raised};
use crate::value::{Object, Value};

/// Constructor used when a `New` node has no resolved constructor.
pub type Factory = Arc<dyn Fn(&[Value]) -> Result<Value, Raised> + Send + Sync>;

/// Type of a node or value.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Ty {
    /// Statically unknown; resolved from the runtime value when needed.
    Any,
    /// Runtime type of `Value::Null`.
    Null,
    Bool,
    Int,
    Float,
    Str,
    Array,
    /// A quoted expression tree.
    Expr,
    /// A callable function value.
    Func,
    Object(ObjectType),
}

impl Ty {
    /// Whether `null` is a valid value of this type.
    pub fn is_nullable(&self) -> bool {
        !matches!(self, Ty::Bool | Ty::Int | Ty::Float)
    }

    /// Whether this is `int` or `float`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Ty::Int | Ty::Float)
    }

    /// Generic by-type instantiation.
    ///
    /// Used by `New` nodes without a resolved constructor. Primitive types
    /// produce their default (or copy a single argument of the same type),
    /// arrays are built from the arguments, and object types use their
    /// registered factory or, with no arguments, an empty instance.
    pub fn instantiate(&self, args: &[Value]) -> Result<Value, Raised> {
        match (self, args) {
            (Ty::Bool, []) => Ok(Value::Bool(false)),
            (Ty::Int, []) => Ok(Value::Int(0)),
            (Ty::Float, []) => Ok(Value::Float(0.0)),
            (Ty::Str, []) => Ok(Value::string("")),
            (Ty::Bool, [v @ Value::Bool(_)])
            | (Ty::Int, [v @ Value::Int(_)])
            | (Ty::Float, [v @ Value::Float(_)])
            | (Ty::Str, [v @ Value::Str(_)]) => Ok(v.clone()),
            (Ty::Array, items) => Ok(Value::array(items.to_vec())),
            (Ty::Object(object_type), args) => object_type.instantiate(args),
            _ => Err(Raised::new(
                error_types::not_supported(),
                format!("no compatible constructor found for {self}"),
            )),
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Any => write!(f, "any"),
            Ty::Null => write!(f, "null"),
            Ty::Bool => write!(f, "bool"),
            Ty::Int => write!(f, "int"),
            Ty::Float => write!(f, "float"),
            Ty::Str => write!(f, "str"),
            Ty::Array => write!(f, "array"),
            Ty::Expr => write!(f, "expr"),
            Ty::Func => write!(f, "fn"),
            Ty::Object(object_type) => write!(f, "{}", object_type.name()),
        }
    }
}

struct ObjectTypeData {
    name: Arc<str>,
    base: Option<ObjectType>,
    value_semantics: bool,
    factory: Option<Factory>,
}

/// Nominal object type with an optional base type.
///
/// Identity is the type name: two handles created with the same name are
/// the same type.
#[derive(Clone)]
pub struct ObjectType(Arc<ObjectTypeData>);

impl ObjectType {
    /// A root type with reference semantics.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        ObjectType(Arc::new(ObjectTypeData {
            name: name.into(),
            base: None,
            value_semantics: false,
            factory: None,
        }))
    }

    /// A type deriving from `base`.
    pub fn derived(name: impl Into<Arc<str>>, base: &ObjectType) -> Self {
        ObjectType(Arc::new(ObjectTypeData {
            name: name.into(),
            base: Some(base.clone()),
            value_semantics: false,
            factory: None,
        }))
    }

    /// Same type, compared field by field instead of by reference.
    #[must_use]
    pub fn with_value_semantics(self) -> Self {
        self.rebuild(|data| data.value_semantics = true)
    }

    /// Same type, constructed through `factory` by generic instantiation.
    #[must_use]
    pub fn with_factory(
        self,
        factory: impl Fn(&[Value]) -> Result<Value, Raised> + Send + Sync + 'static,
    ) -> Self {
        let factory: Factory = Arc::new(factory);
        self.rebuild(move |data| data.factory = Some(factory))
    }

    fn rebuild(self, edit: impl FnOnce(&mut ObjectTypeData)) -> Self {
        let mut data = ObjectTypeData {
            name: self.0.name.clone(),
            base: self.0.base.clone(),
            value_semantics: self.0.value_semantics,
            factory: self.0.factory.clone(),
        };
        edit(&mut data);
        ObjectType(Arc::new(data))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn base(&self) -> Option<&ObjectType> {
        self.0.base.as_ref()
    }

    pub fn has_value_semantics(&self) -> bool {
        self.0.value_semantics
    }

    /// Whether `self` is `other` or derives from it.
    pub fn is_subtype_of(&self, other: &ObjectType) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty == other {
                return true;
            }
            current = ty.base();
        }
        false
    }

    fn instantiate(&self, args: &[Value]) -> Result<Value, Raised> {
        match (&self.0.factory, args) {
            (Some(factory), args) => factory(args),
            (None, []) => Ok(Value::Object(Object::new(self.clone()))),
            (None, _) => Err(Raised::new(
                error_types::not_supported(),
                format!("no compatible constructor found for {}", self.name()),
            )),
        }
    }
}

impl PartialEq for ObjectType {
    fn eq(&self, other: &Self) -> bool {
        self.0.name == other.0.name
    }
}

impl Eq for ObjectType {}

impl Hash for ObjectType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectType({})", self.name())
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
