//! Statement execution.

#![allow(missing_docs)]

use std::rc::Rc;

use smol_str::SmolStr;
use steptrace_syntax::ast::{BinaryOp, Expr, FunctionDef, IfBranch, Stmt, StmtKind, Target};

use crate::error::RuntimeError;
use crate::eval::expr::{assign_target, eval_expr, read_name};
use crate::eval::{ops, EvalContext};
use crate::value::{Function, Value};

/// Statement execution result.
#[derive(Debug, Clone)]
pub enum StmtResult {
    Continue,
    Return(Value),
    Break,
    LoopContinue,
}

/// Execute statements in order until one transfers control.
pub fn exec_block(ctx: &mut EvalContext<'_>, body: &[Stmt]) -> Result<StmtResult, RuntimeError> {
    for stmt in body {
        match exec_stmt(ctx, stmt)? {
            StmtResult::Continue => {}
            other => return Ok(other),
        }
    }
    Ok(StmtResult::Continue)
}

/// Execute a statement, firing its line event first.
pub fn exec_stmt(ctx: &mut EvalContext<'_>, stmt: &Stmt) -> Result<StmtResult, RuntimeError> {
    if stmt.is_constant_expr() {
        return Ok(StmtResult::Continue);
    }
    ctx.line(stmt.line);
    match &stmt.kind {
        StmtKind::Expr(expr) => {
            eval_expr(ctx, expr)?;
            Ok(StmtResult::Continue)
        }
        StmtKind::Assign { targets, value } => {
            let value = eval_expr(ctx, value)?;
            for target in targets {
                assign_target(ctx, target, value.clone())?;
            }
            Ok(StmtResult::Continue)
        }
        StmtKind::AugAssign { target, op, value } => {
            exec_aug_assign(ctx, target, *op, value)?;
            Ok(StmtResult::Continue)
        }
        StmtKind::If { branches, orelse } => exec_if(ctx, branches, orelse),
        StmtKind::While { test, body } => {
            let mut first = true;
            loop {
                if !first {
                    ctx.line(stmt.line);
                }
                first = false;
                if !eval_expr(ctx, test)?.is_truthy() {
                    break;
                }
                match exec_block(ctx, body)? {
                    StmtResult::Continue | StmtResult::LoopContinue => {}
                    StmtResult::Break => break,
                    result @ StmtResult::Return(_) => return Ok(result),
                }
            }
            Ok(StmtResult::Continue)
        }
        StmtKind::For { target, iter, body } => {
            let iterable = eval_expr(ctx, iter)?;
            let iterator = ops::iterate(&iterable)?;
            let mut first = true;
            loop {
                // The header line fires again before every fetch, including
                // the one that finds the iterator exhausted.
                if !first {
                    ctx.line(stmt.line);
                }
                first = false;
                let Some(item) = iterator.borrow_mut().next_value() else {
                    break;
                };
                assign_target(ctx, target, item)?;
                match exec_block(ctx, body)? {
                    StmtResult::Continue | StmtResult::LoopContinue => {}
                    StmtResult::Break => break,
                    result @ StmtResult::Return(_) => return Ok(result),
                }
            }
            Ok(StmtResult::Continue)
        }
        StmtKind::Break => Ok(StmtResult::Break),
        StmtKind::Continue => Ok(StmtResult::LoopContinue),
        StmtKind::Pass => Ok(StmtResult::Continue),
        StmtKind::Return(value) => {
            let value = match value {
                Some(expr) => eval_expr(ctx, expr)?,
                None => Value::None,
            };
            Ok(StmtResult::Return(value))
        }
        StmtKind::Raise(value) => Err(match value {
            Some(expr) => {
                let value = eval_expr(ctx, expr)?;
                raise_value(&value)
            }
            None => RuntimeError::Raised {
                class: "RuntimeError".into(),
                message: "No active exception to reraise".into(),
            },
        }),
        StmtKind::FunctionDef(def) => {
            exec_function_def(ctx, def)?;
            Ok(StmtResult::Continue)
        }
    }
}

fn exec_if(
    ctx: &mut EvalContext<'_>,
    branches: &[IfBranch],
    orelse: &[Stmt],
) -> Result<StmtResult, RuntimeError> {
    for (i, branch) in branches.iter().enumerate() {
        if i > 0 {
            ctx.line(branch.line);
        }
        if eval_expr(ctx, &branch.test)?.is_truthy() {
            return exec_block(ctx, &branch.body);
        }
    }
    exec_block(ctx, orelse)
}

fn exec_aug_assign(
    ctx: &mut EvalContext<'_>,
    target: &Target,
    op: BinaryOp,
    value: &Expr,
) -> Result<(), RuntimeError> {
    match target {
        Target::Name(name) => {
            let current = read_name(ctx, name)?;
            let rhs = eval_expr(ctx, value)?;
            let result = ops::inplace_op(op, &current, &rhs)?;
            assign_target(ctx, target, result)
        }
        Target::Subscript { value: container, index } => {
            let container = eval_expr(ctx, container)?;
            let index = eval_expr(ctx, index)?;
            let current = ops::get_item(&container, &index)?;
            let rhs = eval_expr(ctx, value)?;
            let result = ops::inplace_op(op, &current, &rhs)?;
            ops::set_item(&container, index, result)
        }
        Target::Tuple(_) => Err(RuntimeError::type_error(
            "illegal expression for augmented assignment",
        )),
    }
}

fn exec_function_def(ctx: &mut EvalContext<'_>, def: &Rc<FunctionDef>) -> Result<(), RuntimeError> {
    let mut defaults = Vec::new();
    for param in &def.params {
        if let Some(default) = &param.default {
            defaults.push(eval_expr(ctx, default)?);
        }
    }
    let source = ctx
        .state
        .stack
        .current()
        .map(|frame| frame.source)
        .unwrap_or(crate::memory::SourceId(0));
    let function = Function {
        def: Rc::clone(def),
        defaults,
        source,
    };
    let name: SmolStr = def.name.clone();
    assign_target(ctx, &Target::Name(name), Value::Function(Rc::new(function)))
}

/// Turn the operand of `raise` into the fault it raises.
fn raise_value(value: &Value) -> RuntimeError {
    match value {
        Value::Exception(exception) => RuntimeError::Raised {
            class: exception.class.clone(),
            message: exception.message.clone(),
        },
        Value::Builtin(builtin) if builtin.is_exception_class() => RuntimeError::Raised {
            class: builtin.name().into(),
            message: SmolStr::default(),
        },
        _ => RuntimeError::type_error("exceptions must derive from BaseException"),
    }
}
