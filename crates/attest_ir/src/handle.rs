//! Member and method handles.
//!
//! Handles are resolved once, when a fixture or test describes itself, and
//! embedded in nodes as opaque invocable values. Evaluating a node never
//! resolves anything by name; it only invokes the handle it carries.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::raised::Raised;
use crate::ty::{ObjectType, Ty};
use crate::value::Value;

type Getter = dyn Fn(Option<&Value>) -> Result<Value, Raised> + Send + Sync;
type Setter = dyn Fn(Option<&Value>, Value) -> Result<(), Raised> + Send + Sync;

struct MemberData {
    name: Arc<str>,
    declaring: Arc<str>,
    ty: Ty,
    is_static: bool,
    get: Box<Getter>,
    set: Option<Box<Setter>>,
}

/// A readable (and possibly writable) field or property.
#[derive(Clone)]
pub struct Member(Arc<MemberData>);

impl Member {
    /// Instance field stored on objects of `declaring`. Readable and writable.
    pub fn field(declaring: &ObjectType, name: impl Into<Arc<str>>, ty: Ty) -> Self {
        let name: Arc<str> = name.into();
        let get_name = name.clone();
        let set_name = name.clone();
        Member(Arc::new(MemberData {
            name,
            declaring: declaring.name().into(),
            ty,
            is_static: false,
            get: Box::new(move |target| {
                let object = target.and_then(Value::as_object).ok_or_else(|| {
                    Raised::invalid_operation(format!("`{get_name}` needs an object target"))
                })?;
                Ok(object.get(&get_name).unwrap_or(Value::Null))
            }),
            set: Some(Box::new(move |target, value| {
                let object = target.and_then(Value::as_object).ok_or_else(|| {
                    Raised::invalid_operation(format!("`{set_name}` needs an object target"))
                })?;
                object.set(set_name.clone(), value);
                Ok(())
            })),
        }))
    }

    /// Read-only instance property computed from the target value.
    pub fn property(
        declaring: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        ty: Ty,
        get: impl Fn(&Value) -> Result<Value, Raised> + Send + Sync + 'static,
    ) -> Self {
        let name: Arc<str> = name.into();
        let get_name = name.clone();
        Member(Arc::new(MemberData {
            name,
            declaring: declaring.into(),
            ty,
            is_static: false,
            get: Box::new(move |target| match target {
                Some(target) => get(target),
                None => Err(Raised::invalid_operation(format!(
                    "`{get_name}` is an instance property"
                ))),
            }),
            set: None,
        }))
    }

    /// Static, writable storage cell holding `initial`.
    pub fn static_cell(
        declaring: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        ty: Ty,
        initial: Value,
    ) -> Self {
        let cell = Arc::new(RwLock::new(initial));
        let read = cell.clone();
        Member(Arc::new(MemberData {
            name: name.into(),
            declaring: declaring.into(),
            ty,
            is_static: true,
            get: Box::new(move |_| Ok(read.read().clone())),
            set: Some(Box::new(move |_, value| {
                *cell.write() = value;
                Ok(())
            })),
        }))
    }

    /// Read-only static property.
    pub fn static_property(
        declaring: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        ty: Ty,
        get: impl Fn() -> Result<Value, Raised> + Send + Sync + 'static,
    ) -> Self {
        Member(Arc::new(MemberData {
            name: name.into(),
            declaring: declaring.into(),
            ty,
            is_static: true,
            get: Box::new(move |_| get()),
            set: None,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Name of the type declaring this member.
    pub fn declaring(&self) -> &str {
        &self.0.declaring
    }

    pub fn ty(&self) -> &Ty {
        &self.0.ty
    }

    pub fn is_static(&self) -> bool {
        self.0.is_static
    }

    pub fn is_writable(&self) -> bool {
        self.0.set.is_some()
    }

    pub fn get(&self, target: Option<&Value>) -> Result<Value, Raised> {
        (self.0.get)(target)
    }

    pub fn set(&self, target: Option<&Value>, value: Value) -> Result<(), Raised> {
        match &self.0.set {
            Some(set) => set(target, value),
            None => Err(Raised::invalid_operation(format!(
                "`{}.{}` is read-only",
                self.0.declaring, self.0.name
            ))),
        }
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Member({}.{})", self.0.declaring, self.0.name)
    }
}

/// A method parameter.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Param {
    pub name: Arc<str>,
    pub ty: Ty,
    /// Output parameter: the value left in its argument slot after the call
    /// is written back into the argument expression.
    pub out: bool,
}

impl Param {
    pub fn new(name: impl Into<Arc<str>>, ty: Ty) -> Self {
        Param {
            name: name.into(),
            ty,
            out: false,
        }
    }

    pub fn out(name: impl Into<Arc<str>>, ty: Ty) -> Self {
        Param {
            name: name.into(),
            ty,
            out: true,
        }
    }
}

/// Method body: receives the target (`None` for static methods) and the
/// argument slots, which output parameters may overwrite.
pub type MethodFn = dyn Fn(Option<&Value>, &mut [Value]) -> Result<Value, Raised> + Send + Sync;

struct MethodData {
    name: Arc<str>,
    declaring: Arc<str>,
    params: Vec<Param>,
    return_ty: Ty,
    is_static: bool,
    invoke: Box<MethodFn>,
}

/// An invocable method, operator overload, conversion or constructor.
#[derive(Clone)]
pub struct Method(Arc<MethodData>);

/// Identity of a method signature, used to look up phrasings.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MethodKey {
    pub declaring: Arc<str>,
    pub name: Arc<str>,
    pub params: Vec<Ty>,
}

impl Method {
    pub fn instance(
        declaring: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        params: Vec<Param>,
        return_ty: Ty,
        invoke: impl Fn(&Value, &mut [Value]) -> Result<Value, Raised> + Send + Sync + 'static,
    ) -> Self {
        let name: Arc<str> = name.into();
        let call_name = name.clone();
        Method(Arc::new(MethodData {
            name,
            declaring: declaring.into(),
            params,
            return_ty,
            is_static: false,
            invoke: Box::new(move |target, args| match target {
                Some(target) => invoke(target, args),
                None => Err(Raised::invalid_operation(format!(
                    "`{call_name}` is an instance method"
                ))),
            }),
        }))
    }

    /// Static method; also the shape of operator overloads, conversions and
    /// constructors.
    pub fn function(
        declaring: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        params: Vec<Param>,
        return_ty: Ty,
        invoke: impl Fn(&mut [Value]) -> Result<Value, Raised> + Send + Sync + 'static,
    ) -> Self {
        Method(Arc::new(MethodData {
            name: name.into(),
            declaring: declaring.into(),
            params,
            return_ty,
            is_static: true,
            invoke: Box::new(move |_, args| invoke(args)),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn declaring(&self) -> &str {
        &self.0.declaring
    }

    pub fn params(&self) -> &[Param] {
        &self.0.params
    }

    pub fn return_ty(&self) -> &Ty {
        &self.0.return_ty
    }

    pub fn is_static(&self) -> bool {
        self.0.is_static
    }

    pub fn has_out_params(&self) -> bool {
        self.0.params.iter().any(|param| param.out)
    }

    pub fn key(&self) -> MethodKey {
        MethodKey {
            declaring: self.0.declaring.clone(),
            name: self.0.name.clone(),
            params: self.0.params.iter().map(|param| param.ty.clone()).collect(),
        }
    }

    /// Invokes the method. Errors raised by the body are returned as-is.
    pub fn invoke(&self, target: Option<&Value>, args: &mut [Value]) -> Result<Value, Raised> {
        if args.len() != self.0.params.len() {
            return Err(Raised::new(
                crate::raised::error_types::argument(),
                format!(
                    "`{}` expects {} arguments, got {}",
                    self.0.name,
                    self.0.params.len(),
                    args.len()
                ),
            ));
        }
        (self.0.invoke)(target, args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({}.{})", self.0.declaring, self.0.name)
    }
}

#[cfg(test)]
mod tests;
