//! Expression interpreter.
//!
//! Walks a captured tree child-first. When the target of a member access or
//! method call evaluates to null, evaluation stops with a `Fault` naming the
//! target as the offender and the expression being evaluated as context.
//! A target is evaluated as an expression of its own, so a null found deeper
//! inside it is reported against the target rather than the root.
//!
//! Trees containing shapes the interpreter does not handle are run through
//! the compiled fallback as a whole.

use std::sync::Arc;

use attest_ir::{BinaryOp, Fault, Method, Node, NodeKind, Raised, Ty, Value};

use crate::compile;
use crate::config::{EvalConfig, RelationalPolicy};
use crate::conversion::ConversionCache;
use crate::errors::{EvalError, EvalResult};
use crate::invoke::invoke_method;
use crate::stack::ensure_sufficient_stack;
use crate::support::find_unsupported;

/// An evaluated comparison.
#[derive(Clone, Debug)]
pub struct Comparison {
    pub op: BinaryOp,
    pub left: Value,
    pub right: Value,
    /// Result of the operator, usually a bool.
    pub result: Value,
}

/// An evaluated method call.
#[derive(Clone, Debug)]
pub struct Call {
    pub method: Method,
    pub target: Option<Value>,
    /// Argument values as passed to the method.
    pub args: Vec<Value>,
    pub result: Value,
}

/// Evaluates captured expressions.
///
/// Cheap to clone; clones share the conversion cache.
#[derive(Clone, Debug)]
pub struct Evaluator {
    config: EvalConfig,
    conversions: Arc<ConversionCache>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator {
            config: EvalConfig::default(),
            conversions: Arc::new(ConversionCache::new()),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    /// Shares `conversions` with this evaluator.
    #[must_use]
    pub fn with_conversions(mut self, conversions: Arc<ConversionCache>) -> Self {
        self.conversions = conversions;
        self
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn conversions(&self) -> &Arc<ConversionCache> {
        &self.conversions
    }

    /// Evaluates `node` exactly once.
    ///
    /// A zero-parameter lambda at the root is evaluated as its body.
    #[tracing::instrument(level = "trace", skip_all, fields(kind = node.kind().name()))]
    pub fn evaluate(&self, node: &Node) -> EvalResult {
        let root = node.unwrap_thunk();
        if let Some(unsupported) = find_unsupported(root, &self.config) {
            tracing::debug!(
                kind = unsupported.node.kind().name(),
                "interpreter cannot evaluate node, running compiled fallback"
            );
            return compile::run(root, &self.conversions).map_err(EvalError::Raised);
        }
        self.eval(root, root)
    }

    /// Evaluates a comparison, keeping both operands.
    ///
    /// Each operand is evaluated once, with the whole comparison as fault
    /// context. Returns `None` when `node` is not a comparison.
    pub fn evaluate_comparison(&self, node: &Node) -> Result<Option<Comparison>, EvalError> {
        let root = node.unwrap_thunk();
        let NodeKind::Binary {
            op,
            left,
            right,
            overload,
        } = root.kind()
        else {
            return Ok(None);
        };
        if !op.is_comparison() {
            return Ok(None);
        }

        let (left, right) = if let Some(unsupported) = find_unsupported(root, &self.config) {
            tracing::debug!(
                kind = unsupported.node.kind().name(),
                "interpreter cannot evaluate comparison, running compiled fallback"
            );
            (
                compile::run(left, &self.conversions)?,
                compile::run(right, &self.conversions)?,
            )
        } else {
            (self.eval(left, root)?, self.eval(right, root)?)
        };
        let result = match overload {
            Some(method) => method.invoke(None, &mut [left.clone(), right.clone()])?,
            None => compile::compare(*op, &left, &right)?,
        };
        Ok(Some(Comparison {
            op: *op,
            left,
            right,
            result,
        }))
    }

    /// Evaluates a method call, keeping its target and arguments.
    ///
    /// Returns `None` when `node` is not a method call or cannot be
    /// interpreted; nothing has been evaluated in that case.
    pub fn evaluate_call(&self, node: &Node) -> Result<Option<Call>, EvalError> {
        let root = node.unwrap_thunk();
        let NodeKind::MethodCall {
            target,
            method,
            args,
        } = root.kind()
        else {
            return Ok(None);
        };
        if find_unsupported(root, &self.config).is_some() {
            return Ok(None);
        }

        let target = self.eval_target(target.as_ref(), root)?;
        let values = self.eval_all(args, root)?;
        let result = invoke_method(method, target.as_ref(), values.clone(), |index, value| {
            self.write_back(&args[index], value)
        })?;
        Ok(Some(Call {
            method: method.clone(),
            target,
            args: values,
            result,
        }))
    }

    fn eval(&self, node: &Node, context: &Node) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(node, context))
    }

    fn eval_inner(&self, node: &Node, context: &Node) -> EvalResult {
        match node.kind() {
            NodeKind::Constant { value, .. } => Ok(value.clone()),
            NodeKind::MemberAccess { target, member } => {
                let target = self.eval_target(target.as_ref(), context)?;
                Ok(member.get(target.as_ref())?)
            }
            NodeKind::MethodCall {
                target,
                method,
                args,
            } => {
                let target = self.eval_target(target.as_ref(), context)?;
                let values = self.eval_all(args, context)?;
                invoke_method(method, target.as_ref(), values, |index, value| {
                    self.write_back(&args[index], value)
                })
            }
            NodeKind::Binary {
                op,
                left,
                right,
                overload,
            } => {
                let left = self.eval(left, context)?;
                let right = self.eval(right, context)?;
                match overload {
                    Some(method) => Ok(method.invoke(None, &mut [left, right])?),
                    None => self.compare(*op, &left, &right),
                }
            }
            NodeKind::Convert {
                operand,
                ty,
                conversion,
            } => {
                let value = self.eval(operand, context)?;
                match conversion {
                    Some(method) => Ok(method.invoke(None, &mut [value])?),
                    None => {
                        let from = match operand.ty() {
                            Ty::Any => value.ty(),
                            declared => declared,
                        };
                        Ok(self.conversions.convert(&from, ty, value)?)
                    }
                }
            }
            NodeKind::New { ty, ctor, args } => {
                let mut values = self.eval_all(args, context)?;
                match ctor {
                    Some(ctor) => Ok(ctor.invoke(None, &mut values)?),
                    None => Ok(ty.instantiate(&values)?),
                }
            }
            NodeKind::ArrayIndex { array, index } => {
                let items = self.eval_target(Some(array), context)?;
                let index = self.eval(index, context)?;
                Ok(index_array(items.as_ref(), &index)?)
            }
            NodeKind::Quote { inner } => Ok(Value::Expr(inner.clone())),
            NodeKind::Lambda { params, body } if params.is_empty() => self.eval(body, context),
            kind => Err(EvalError::Raised(Raised::not_supported(format!(
                "the interpreter does not evaluate {} nodes",
                kind.name()
            )))),
        }
    }

    /// Evaluates a member/call target as an expression of its own.
    ///
    /// `None` (a static access) stays `None`; a null target is a fault.
    fn eval_target(
        &self,
        target: Option<&Node>,
        context: &Node,
    ) -> Result<Option<Value>, EvalError> {
        let Some(target) = target else {
            return Ok(None);
        };
        let value = self.eval(target, target)?;
        if value.is_null() {
            return Err(EvalError::Fault(Fault::new(context.clone(), target.clone())));
        }
        Ok(Some(value))
    }

    fn eval_all(&self, nodes: &[Node], context: &Node) -> Result<Vec<Value>, EvalError> {
        nodes.iter().map(|node| self.eval(node, context)).collect()
    }

    fn compare(&self, op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
        match op {
            BinaryOp::Eq => Ok(Value::Bool(left == right)),
            BinaryOp::NotEq => Ok(Value::Bool(left != right)),
            op if op.is_relational()
                && self.config.relational == RelationalPolicy::DefaultOrdering =>
            {
                Ok(compile::order(op, left, right)?)
            }
            op => Err(EvalError::Raised(Raised::not_supported(format!(
                "operator `{}` has no implementation for these operands",
                op.as_symbol()
            )))),
        }
    }

    /// Stores an output argument back into the slot its expression reads.
    fn write_back(&self, arg: &Node, value: Value) -> Result<(), EvalError> {
        match arg.kind() {
            NodeKind::MemberAccess { target, member } => {
                let target = match target {
                    Some(target) => Some(self.eval(target, target)?),
                    None => None,
                };
                Ok(member.set(target.as_ref(), value)?)
            }
            kind => Err(EvalError::Raised(Raised::invalid_operation(format!(
                "output argument must be a field or property, got {}",
                kind.name()
            )))),
        }
    }
}

/// `items[index]`, with `items` already checked for null.
pub(crate) fn index_array(items: Option<&Value>, index: &Value) -> Result<Value, Raised> {
    let Some(items) = items.and_then(Value::as_array) else {
        return Err(Raised::invalid_cast("indexed value is not an array"));
    };
    let Some(i) = index.as_int() else {
        return Err(Raised::invalid_cast("array index must be an int"));
    };
    usize::try_from(i)
        .ok()
        .and_then(|i| items.get(i))
        .cloned()
        .ok_or_else(|| Raised::index_out_of_range(i, items.len()))
}
