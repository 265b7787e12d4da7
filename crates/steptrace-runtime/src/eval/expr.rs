//! Expression evaluation and name binding.

#![allow(missing_docs)]

use smol_str::SmolStr;
use steptrace_syntax::ast::{BoolOp, Expr, Literal, Target, UnaryOp};

use crate::error::RuntimeError;
use crate::eval::builtins::Builtin;
use crate::eval::{call, methods, ops, EvalContext};
use crate::memory::FrameKind;
use crate::value::{Dict, Value};

/// Evaluate an expression.
pub fn eval_expr(ctx: &mut EvalContext<'_>, expr: &Expr) -> Result<Value, RuntimeError> {
    match expr {
        Expr::Literal(literal) => Ok(literal_value(literal)),
        Expr::Name(name) => read_name(ctx, name),
        Expr::List(items) => Ok(Value::list(eval_all(ctx, items)?)),
        Expr::Tuple(items) => Ok(Value::tuple(eval_all(ctx, items)?)),
        Expr::Dict(entries) => {
            let mut dict = Dict::new();
            for (key, value) in entries {
                let key = eval_expr(ctx, key)?;
                let value = eval_expr(ctx, value)?;
                dict.insert(key, value)?;
            }
            Ok(Value::dict(dict))
        }
        Expr::Subscript { value, index } => {
            let container = eval_expr(ctx, value)?;
            if let Expr::Slice { lower, upper, step } = index.as_ref() {
                let lower = eval_optional(ctx, lower.as_deref())?;
                let upper = eval_optional(ctx, upper.as_deref())?;
                let step = eval_optional(ctx, step.as_deref())?;
                return ops::get_slice(&container, &lower, &upper, &step);
            }
            let index = eval_expr(ctx, index)?;
            ops::get_item(&container, &index)
        }
        Expr::Slice { .. } => Err(RuntimeError::type_error(
            "slice syntax is only valid inside a subscript",
        )),
        Expr::Attribute { value, attr } => {
            let receiver = eval_expr(ctx, value)?;
            methods::bind(receiver, attr)
        }
        Expr::Call {
            func,
            args,
            keywords,
        } => {
            let callee = eval_expr(ctx, func)?;
            let args = eval_all(ctx, args)?;
            let mut kwargs = Vec::with_capacity(keywords.len());
            for keyword in keywords {
                kwargs.push((keyword.name.clone(), eval_expr(ctx, &keyword.value)?));
            }
            call::call_value(ctx, &callee, args, kwargs)
        }
        Expr::Unary { op, operand } => {
            let operand = eval_expr(ctx, operand)?;
            match op {
                UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
                UnaryOp::Neg => ops::negate(&operand),
                UnaryOp::Pos => ops::positive(&operand),
            }
        }
        Expr::Binary { op, left, right } => {
            let left = eval_expr(ctx, left)?;
            let right = eval_expr(ctx, right)?;
            ops::binary_op(*op, &left, &right)
        }
        Expr::BoolOp { op, left, right } => {
            let left = eval_expr(ctx, left)?;
            let short_circuits = match op {
                BoolOp::And => !left.is_truthy(),
                BoolOp::Or => left.is_truthy(),
            };
            if short_circuits {
                Ok(left)
            } else {
                eval_expr(ctx, right)
            }
        }
        Expr::Compare { left, rest } => {
            let mut current = eval_expr(ctx, left)?;
            for (op, operand) in rest {
                let next = eval_expr(ctx, operand)?;
                if !ops::compare(*op, &current, &next)? {
                    return Ok(Value::Bool(false));
                }
                current = next;
            }
            Ok(Value::Bool(true))
        }
        Expr::IfExp { test, body, orelse } => {
            if eval_expr(ctx, test)?.is_truthy() {
                eval_expr(ctx, body)
            } else {
                eval_expr(ctx, orelse)
            }
        }
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::None => Value::None,
        Literal::Bool(value) => Value::Bool(*value),
        Literal::Int(value) => Value::Int(*value),
        Literal::Float(value) => Value::Float(*value),
        Literal::Str(value) => Value::Str(value.clone()),
    }
}

fn eval_all(ctx: &mut EvalContext<'_>, exprs: &[Expr]) -> Result<Vec<Value>, RuntimeError> {
    exprs.iter().map(|expr| eval_expr(ctx, expr)).collect()
}

fn eval_optional(ctx: &mut EvalContext<'_>, expr: Option<&Expr>) -> Result<Value, RuntimeError> {
    match expr {
        Some(expr) => eval_expr(ctx, expr),
        None => Ok(Value::None),
    }
}

/// Resolve a name: function locals, then globals, then builtins.
pub fn read_name(ctx: &EvalContext<'_>, name: &SmolStr) -> Result<Value, RuntimeError> {
    if let Some(frame) = ctx.state.stack.current() {
        if frame.kind == FrameKind::Function && frame.is_local(name) {
            return frame
                .locals
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::UnboundLocal(name.clone()));
        }
    }
    if let Some(value) = ctx.state.global(name) {
        return Ok(value.clone());
    }
    Builtin::lookup(name)
        .map(Value::Builtin)
        .ok_or_else(|| RuntimeError::UndefinedName(name.clone()))
}

/// Bind `value` to an assignment target.
pub fn assign_target(
    ctx: &mut EvalContext<'_>,
    target: &Target,
    value: Value,
) -> Result<(), RuntimeError> {
    match target {
        Target::Name(name) => {
            bind_name(ctx, name, value);
            Ok(())
        }
        Target::Subscript { value: container, index } => {
            let container = eval_expr(ctx, container)?;
            if matches!(index.as_ref(), Expr::Slice { .. }) {
                return Err(RuntimeError::type_error("slice assignment is not supported"));
            }
            let index = eval_expr(ctx, index)?;
            ops::set_item(&container, index, value)
        }
        Target::Tuple(targets) => {
            let items = ops::unpack(&value, targets.len())?;
            for (target, item) in targets.iter().zip(items) {
                assign_target(ctx, target, item)?;
            }
            Ok(())
        }
    }
}

fn bind_name(ctx: &mut EvalContext<'_>, name: &SmolStr, value: Value) {
    if let Some(frame) = ctx.state.stack.current_mut() {
        if frame.kind == FrameKind::Function && frame.is_local(name) {
            frame.locals.insert(name.clone(), value);
            return;
        }
    }
    ctx.state.globals_mut().insert(name.clone(), value);
}
