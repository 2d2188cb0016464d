//! Compiled fallback.
//!
//! Lowers a whole tree to nested closures and runs it as ordinary code. This
//! covers every node shape, including lambdas with parameters, arithmetic
//! and logical operators, but gives up fault attribution: a null target
//! raises a plain `NullReference` error.

use std::cmp::Ordering;
use std::sync::Arc;

use attest_ir::{
    error_types, BinaryOp, Function, Member, Method, Node, NodeKind, Raised, Ty, Value,
};

use crate::conversion::ConversionCache;
use crate::interpreter::index_array;
use crate::invoke::invoke_method;
use crate::stack::ensure_sufficient_stack;

type Compiled = Arc<dyn Fn(&Env) -> Result<Value, Raised> + Send + Sync>;
type Writer = Arc<dyn Fn(&Env, Value) -> Result<(), Raised> + Send + Sync>;

/// Lambda parameter bindings, innermost first.
#[derive(Clone, Default)]
struct Env(Option<Arc<Binding>>);

struct Binding {
    name: Arc<str>,
    value: Value,
    parent: Env,
}

impl Env {
    fn bind(&self, name: Arc<str>, value: Value) -> Env {
        Env(Some(Arc::new(Binding {
            name,
            value,
            parent: self.clone(),
        })))
    }

    fn lookup(&self, name: &str) -> Option<Value> {
        let mut current = self.0.as_ref();
        while let Some(binding) = current {
            if &*binding.name == name {
                return Some(binding.value.clone());
            }
            current = binding.parent.0.as_ref();
        }
        None
    }
}

/// Compiles and runs `node`.
pub(crate) fn run(node: &Node, conversions: &Arc<ConversionCache>) -> Result<Value, Raised> {
    let compiler = Compiler {
        conversions: Arc::clone(conversions),
    };
    let compiled = compiler.compile(node);
    compiled(&Env::default())
}

struct Compiler {
    conversions: Arc<ConversionCache>,
}

impl Compiler {
    fn compile(&self, node: &Node) -> Compiled {
        ensure_sufficient_stack(|| self.compile_inner(node))
    }

    fn compile_all(&self, nodes: &[Node]) -> Arc<[Compiled]> {
        nodes.iter().map(|node| self.compile(node)).collect()
    }

    fn compile_inner(&self, node: &Node) -> Compiled {
        match node.kind() {
            NodeKind::Constant { value, .. } => {
                let value = value.clone();
                Arc::new(move |_: &Env| Ok(value.clone()))
            }
            NodeKind::MemberAccess { target, member } => {
                let target = target.as_ref().map(|t| self.compile(t));
                let member = member.clone();
                Arc::new(move |env: &Env| {
                    let target = eval_target(target.as_ref(), env, member.name())?;
                    member.get(target.as_ref())
                })
            }
            NodeKind::MethodCall {
                target,
                method,
                args,
            } => self.compile_call(target.as_ref(), method, args),
            NodeKind::Binary {
                op,
                left,
                right,
                overload,
            } => self.compile_binary(*op, left, right, overload.as_ref()),
            NodeKind::Convert {
                operand,
                ty,
                conversion,
            } => {
                let operand_ty = operand.ty();
                let operand = self.compile(operand);
                if let Some(method) = conversion.clone() {
                    return Arc::new(move |env: &Env| method.invoke(None, &mut [operand(env)?]));
                }
                let conversions = Arc::clone(&self.conversions);
                let ty = ty.clone();
                Arc::new(move |env: &Env| {
                    let value = operand(env)?;
                    let from = match &operand_ty {
                        Ty::Any => value.ty(),
                        declared => declared.clone(),
                    };
                    conversions.convert(&from, &ty, value)
                })
            }
            NodeKind::New { ty, ctor, args } => {
                let args = self.compile_all(args);
                let ty = ty.clone();
                let ctor = ctor.clone();
                Arc::new(move |env: &Env| {
                    let mut values = eval_all(&args, env)?;
                    match &ctor {
                        Some(ctor) => ctor.invoke(None, &mut values),
                        None => ty.instantiate(&values),
                    }
                })
            }
            NodeKind::ArrayIndex { array, index } => {
                let array = self.compile(array);
                let index = self.compile(index);
                Arc::new(move |env: &Env| {
                    let items = eval_target(Some(&array), env, "[]")?;
                    let index = index(env)?;
                    index_array(items.as_ref(), &index)
                })
            }
            NodeKind::ArrayLength { array } => {
                let array = self.compile(array);
                Arc::new(move |env: &Env| {
                    let items = eval_target(Some(&array), env, "Length")?;
                    let len = items
                        .as_ref()
                        .and_then(Value::as_array)
                        .map(<[Value]>::len)
                        .ok_or_else(|| Raised::invalid_cast("length of a non-array value"))?;
                    i64::try_from(len)
                        .map(Value::Int)
                        .map_err(|_| Raised::new(error_types::overflow(), "array too long"))
                })
            }
            NodeKind::Quote { inner } => {
                let inner = inner.clone();
                Arc::new(move |_: &Env| Ok(Value::Expr(inner.clone())))
            }
            NodeKind::Lambda { params, body } => {
                let names: Arc<[Arc<str>]> = params
                    .iter()
                    .map(|param| match param.kind() {
                        NodeKind::Parameter { name, .. } => name.clone(),
                        _ => Arc::from("_"),
                    })
                    .collect();
                let body = self.compile(body);
                Arc::new(move |env: &Env| {
                    let captured = env.clone();
                    let names = Arc::clone(&names);
                    let body = Arc::clone(&body);
                    Ok(Value::Func(Function::new(names.len(), move |args| {
                        let scope = names
                            .iter()
                            .zip(args)
                            .fold(captured.clone(), |scope, (name, arg)| {
                                scope.bind(name.clone(), arg.clone())
                            });
                        body(&scope)
                    })))
                })
            }
            NodeKind::Parameter { name, .. } => {
                let name = name.clone();
                Arc::new(move |env: &Env| {
                    env.lookup(&name).ok_or_else(|| {
                        Raised::invalid_operation(format!("parameter `{name}` is not bound"))
                    })
                })
            }
            NodeKind::Invoke { callee, args } => {
                let callee = self.compile(callee);
                let args = self.compile_all(args);
                Arc::new(move |env: &Env| match callee(env)? {
                    Value::Func(func) => func.call(&eval_all(&args, env)?),
                    Value::Null => Err(Raised::null_reference("invoked function is null")),
                    other => Err(Raised::invalid_cast(format!("{} is not callable", other.ty()))),
                })
            }
            NodeKind::Not { operand } => {
                let operand = self.compile(operand);
                Arc::new(move |env: &Env| Ok(Value::Bool(!as_bool(&operand(env)?)?)))
            }
            NodeKind::Conditional {
                test,
                then,
                otherwise,
            } => {
                let test = self.compile(test);
                let then = self.compile(then);
                let otherwise = self.compile(otherwise);
                Arc::new(move |env: &Env| {
                    if as_bool(&test(env)?)? {
                        then(env)
                    } else {
                        otherwise(env)
                    }
                })
            }
        }
    }

    fn compile_call(&self, target: Option<&Node>, method: &Method, args: &[Node]) -> Compiled {
        let target = target.map(|t| self.compile(t));
        let compiled_args = self.compile_all(args);
        let writers: Arc<[Option<Writer>]> = method
            .params()
            .iter()
            .zip(args)
            .map(|(param, arg)| param.out.then(|| self.compile_writer(arg)))
            .collect();
        let method = method.clone();
        Arc::new(move |env: &Env| {
            let target = eval_target(target.as_ref(), env, method.name())?;
            let values = eval_all(&compiled_args, env)?;
            invoke_method(&method, target.as_ref(), values, |index, value| {
                match writers.get(index).and_then(Option::as_ref) {
                    Some(write) => write(env, value),
                    None => Err(Raised::invalid_operation("output argument has no writable slot")),
                }
            })
        })
    }

    fn compile_writer(&self, arg: &Node) -> Writer {
        match arg.kind() {
            NodeKind::MemberAccess { target, member } => {
                let target = target.as_ref().map(|t| self.compile(t));
                let member: Member = member.clone();
                Arc::new(move |env: &Env, value: Value| {
                    let target = eval_target(target.as_ref(), env, member.name())?;
                    member.set(target.as_ref(), value)
                })
            }
            kind => {
                let kind = kind.name();
                Arc::new(move |_: &Env, _: Value| {
                    Err(Raised::invalid_operation(format!(
                        "output argument must be a field or property, got {kind}"
                    )))
                })
            }
        }
    }

    fn compile_binary(
        &self,
        op: BinaryOp,
        left: &Node,
        right: &Node,
        overload: Option<&Method>,
    ) -> Compiled {
        let left = self.compile(left);
        let right = self.compile(right);
        if let Some(method) = overload.cloned() {
            return Arc::new(move |env: &Env| method.invoke(None, &mut [left(env)?, right(env)?]));
        }
        match op {
            BinaryOp::And => Arc::new(move |env: &Env| {
                Ok(Value::Bool(as_bool(&left(env)?)? && as_bool(&right(env)?)?))
            }),
            BinaryOp::Or => Arc::new(move |env: &Env| {
                Ok(Value::Bool(as_bool(&left(env)?)? || as_bool(&right(env)?)?))
            }),
            BinaryOp::Eq => Arc::new(move |env: &Env| Ok(Value::Bool(left(env)? == right(env)?))),
            BinaryOp::NotEq => {
                Arc::new(move |env: &Env| Ok(Value::Bool(left(env)? != right(env)?)))
            }
            op if op.is_relational() => {
                Arc::new(move |env: &Env| order(op, &left(env)?, &right(env)?))
            }
            op => Arc::new(move |env: &Env| arithmetic(op, &left(env)?, &right(env)?)),
        }
    }
}

fn eval_all(args: &[Compiled], env: &Env) -> Result<Vec<Value>, Raised> {
    args.iter().map(|arg| arg(env)).collect()
}

/// Evaluates a target, raising `NullReference` for null.
fn eval_target(
    target: Option<&Compiled>,
    env: &Env,
    accessing: &str,
) -> Result<Option<Value>, Raised> {
    let Some(target) = target else {
        return Ok(None);
    };
    match target(env)? {
        Value::Null => Err(Raised::null_reference(format!(
            "`{accessing}` accessed on a null value"
        ))),
        value => Ok(Some(value)),
    }
}

fn as_bool(value: &Value) -> Result<bool, Raised> {
    value
        .as_bool()
        .ok_or_else(|| Raised::invalid_cast(format!("expected bool, got {}", value.ty())))
}

/// Equality by structural comparison, relational operators by natural
/// ordering.
pub(crate) fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, Raised> {
    match op {
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => Ok(Value::Bool(left != right)),
        op => order(op, left, right),
    }
}

/// Relational comparison by natural ordering.
pub(crate) fn order(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, Raised> {
    let ordering = left.natural_order(right).ok_or_else(|| {
        Raised::invalid_operation(format!(
            "cannot compare {} {} {}",
            left.ty(),
            op.as_symbol(),
            right.ty()
        ))
    })?;
    let holds = match op {
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::GtEq => ordering != Ordering::Less,
        op => {
            return Err(Raised::invalid_operation(format!(
                "`{}` is not a relational operator",
                op.as_symbol()
            )))
        }
    };
    Ok(Value::Bool(holds))
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, Raised> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_arithmetic(op, *a, *b),
        (Value::Str(a), Value::Str(b)) if op == BinaryOp::Add => {
            Ok(Value::string(format!("{a}{b}")))
        }
        (a, b) => match (a.as_float(), b.as_float()) {
            (Some(x), Some(y)) => float_arithmetic(op, x, y),
            _ => Err(Raised::invalid_operation(format!(
                "operator `{}` cannot be applied to {} and {}",
                op.as_symbol(),
                a.ty(),
                b.ty()
            ))),
        },
    }
}

fn int_arithmetic(op: BinaryOp, a: i64, b: i64) -> Result<Value, Raised> {
    if matches!(op, BinaryOp::Div | BinaryOp::Mod) && b == 0 {
        return Err(Raised::new(error_types::divide_by_zero(), "attempted to divide by zero"));
    }
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div => a.checked_div(b),
        BinaryOp::Mod => a.checked_rem(b),
        op => {
            return Err(Raised::invalid_operation(format!(
                "`{}` is not an arithmetic operator",
                op.as_symbol()
            )))
        }
    };
    result.map(Value::Int).ok_or_else(|| {
        Raised::new(
            error_types::overflow(),
            format!("{a} {} {b} overflowed", op.as_symbol()),
        )
    })
}

fn float_arithmetic(op: BinaryOp, x: f64, y: f64) -> Result<Value, Raised> {
    let result = match op {
        BinaryOp::Add => x + y,
        BinaryOp::Sub => x - y,
        BinaryOp::Mul => x * y,
        BinaryOp::Div => x / y,
        BinaryOp::Mod => x % y,
        op => {
            return Err(Raised::invalid_operation(format!(
                "`{}` is not an arithmetic operator",
                op.as_symbol()
            )))
        }
    };
    Ok(Value::Float(result))
}

#[cfg(test)]
mod tests;
