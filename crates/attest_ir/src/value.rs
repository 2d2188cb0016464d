//! Runtime values produced by evaluating a captured expression.
//!
//! All heap-backed variants are `Arc`-based, so cloning a value is cheap and
//! values can cross the worker threads of a parallel session.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::node::Node;
use crate::raised::{error_types, Raised};
use crate::ty::{ObjectType, Ty};

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    /// The null/undefined reference.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    Array(Arc<[Value]>),
    Object(Object),
    /// A quoted expression tree, returned unevaluated.
    Expr(Node),
    Func(Function),
}

// Factory Methods

impl Value {
    #[inline]
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(items.into())
    }
}

// Value Methods

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value widened to `f64`.
    #[expect(
        clippy::cast_precision_loss,
        reason = "int/float comparisons promote the int the same way the fallback arithmetic does"
    )]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Runtime type of this value.
    pub fn ty(&self) -> Ty {
        match self {
            Value::Null => Ty::Null,
            Value::Bool(_) => Ty::Bool,
            Value::Int(_) => Ty::Int,
            Value::Float(_) => Ty::Float,
            Value::Str(_) => Ty::Str,
            Value::Array(_) => Ty::Array,
            Value::Object(object) => Ty::Object(object.ty().clone()),
            Value::Expr(_) => Ty::Expr,
            Value::Func(_) => Ty::Func,
        }
    }

    /// Whether this value can be stored in a slot of type `ty`.
    pub fn is_instance_of(&self, ty: &Ty) -> bool {
        match (self, ty) {
            (_, Ty::Any) | (Value::Int(_), Ty::Float) => true,
            (Value::Null, ty) => ty.is_nullable(),
            (Value::Object(object), Ty::Object(expected)) => object.ty().is_subtype_of(expected),
            (value, ty) => value.ty() == *ty,
        }
    }

    /// Natural ordering of numbers, strings and booleans.
    ///
    /// `None` when the values are not comparable (mixed kinds, NaN).
    pub fn natural_order(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (a, b) => a.as_float()?.partial_cmp(&b.as_float()?),
        }
    }
}

/// Structural equality.
///
/// Numbers compare exactly across kinds (`2 == 2.0`, but an integer never
/// equals a float that merely rounds to it) and `NaN` equals itself.
/// Strings and arrays compare by content, objects by reference unless their
/// type has value semantics, expression trees and functions by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        structural_eq(self, other, &mut Vec::new())
    }
}

/// `visiting` holds the object pairs being compared further up the graph;
/// meeting one again compares equal, so cyclic objects terminate.
fn structural_eq(a: &Value, b: &Value, visiting: &mut Vec<(Object, Object)>) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => float_eq(*a, *b),
        (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => int_float_eq(*i, *f),
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(x, y)| structural_eq(x, y, visiting))
        }
        (Value::Object(a), Value::Object(b)) => objects_eq(a, b, visiting),
        (Value::Expr(a), Value::Expr(b)) => a.ptr_eq(b),
        (Value::Func(a), Value::Func(b)) => a.ptr_eq(b),
        _ => false,
    }
}

fn objects_eq(a: &Object, b: &Object, visiting: &mut Vec<(Object, Object)>) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    if a.ty() != b.ty() || !a.ty().has_value_semantics() {
        return false;
    }
    if visiting.iter().any(|(x, y)| x.ptr_eq(a) && y.ptr_eq(b)) {
        return true;
    }

    visiting.push((a.clone(), b.clone()));
    let (left, right) = (a.fields(), b.fields());
    let equal = left.len() == right.len()
        && left
            .iter()
            .zip(&right)
            .all(|((x_name, x), (y_name, y))| x_name == y_name && structural_eq(x, y, visiting));
    visiting.pop();
    equal
}

fn float_eq(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a.partial_cmp(&b) == Some(Ordering::Equal)
}

/// 2^63, the first float past `i64::MAX`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn int_float_eq(i: i64, f: f64) -> bool {
    if !(-I64_BOUND..I64_BOUND).contains(&f) || f.trunc().total_cmp(&f).is_ne() {
        return false;
    }
    #[expect(clippy::cast_possible_truncation, reason = "integral and in range")]
    let n = f as i64;
    n == i
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(x) => write!(f, "Float({x:?})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Value::Object(object) => write!(f, "Object({})", object.ty().name()),
            Value::Expr(_) => write!(f, "Expr(..)"),
            Value::Func(func) => write!(f, "Func(arity: {})", func.arity()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Func(func)
    }
}

// Objects

struct ObjectData {
    ty: ObjectType,
    fields: RwLock<FxHashMap<Arc<str>, Value>>,
    state: Option<Arc<dyn Any + Send + Sync>>,
}

/// Instance of an `ObjectType`.
///
/// Fields are interior-mutable so output parameters and setters can write
/// through shared references. Native Rust state can be attached and read
/// back by method handles with [`Object::state`].
#[derive(Clone)]
pub struct Object(Arc<ObjectData>);

impl Object {
    pub fn new(ty: ObjectType) -> Self {
        Object(Arc::new(ObjectData {
            ty,
            fields: RwLock::new(FxHashMap::default()),
            state: None,
        }))
    }

    /// An object carrying native state, e.g. a counter a method handle mutates.
    pub fn with_state<T: Any + Send + Sync>(ty: ObjectType, state: T) -> Self {
        Object(Arc::new(ObjectData {
            ty,
            fields: RwLock::new(FxHashMap::default()),
            state: Some(Arc::new(state)),
        }))
    }

    /// Builder-style field initialization.
    #[must_use]
    pub fn field(self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn ty(&self) -> &ObjectType {
        &self.0.ty
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.fields.read().get(name).cloned()
    }

    pub fn set(&self, name: impl Into<Arc<str>>, value: impl Into<Value>) {
        self.0.fields.write().insert(name.into(), value.into());
    }

    /// Snapshot of all fields, sorted by name.
    pub fn fields(&self) -> Vec<(Arc<str>, Value)> {
        let mut fields: Vec<_> = self
            .0
            .fields
            .read()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        fields
    }

    pub fn state<T: Any>(&self) -> Option<&T> {
        self.0.state.as_ref()?.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// Functions

/// Signature of a callable function value.
pub type FunctionFn = dyn Fn(&[Value]) -> Result<Value, Raised> + Send + Sync;

struct FunctionData {
    arity: usize,
    call: Box<FunctionFn>,
}

/// Callable value: a compiled lambda or a delegate supplied by the test.
#[derive(Clone)]
pub struct Function(Arc<FunctionData>);

impl Function {
    pub fn new(
        arity: usize,
        call: impl Fn(&[Value]) -> Result<Value, Raised> + Send + Sync + 'static,
    ) -> Self {
        Function(Arc::new(FunctionData {
            arity,
            call: Box::new(call),
        }))
    }

    pub fn arity(&self) -> usize {
        self.0.arity
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, Raised> {
        if args.len() != self.0.arity {
            return Err(Raised::new(
                error_types::argument(),
                format!(
                    "function expects {} arguments, got {}",
                    self.0.arity,
                    args.len()
                ),
            ));
        }
        (self.0.call)(args)
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
