//! Calling functions, builtins and bound methods.

#![allow(missing_docs)]

use std::rc::Rc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::debug::TraceEvent;
use crate::error::RuntimeError;
use crate::eval::stmt::{exec_block, StmtResult};
use crate::eval::{builtins, methods, EvalContext};
use crate::value::{Function, Value};

/// Call any callable value.
pub fn call_value(
    ctx: &mut EvalContext<'_>,
    callee: &Value,
    args: Vec<Value>,
    kwargs: Vec<(SmolStr, Value)>,
) -> Result<Value, RuntimeError> {
    match callee {
        Value::Function(function) => call_function(ctx, function, args, kwargs),
        Value::Builtin(builtin) => builtins::call(ctx, *builtin, args, kwargs),
        Value::BoundMethod(method) => {
            methods::call_method(ctx, &method.receiver, &method.name, args, kwargs)
        }
        other => Err(RuntimeError::type_error(format!(
            "'{}' object is not callable",
            other.type_name()
        ))),
    }
}

/// Push a frame for `function`, run its body and pop the frame.
///
/// `Call` fires once the arguments are bound; `Return` carries the result,
/// while a fault leaving the frame fires `Exception` instead.
pub fn call_function(
    ctx: &mut EvalContext<'_>,
    function: &Rc<Function>,
    args: Vec<Value>,
    kwargs: Vec<(SmolStr, Value)>,
) -> Result<Value, RuntimeError> {
    if ctx.state.stack.function_depth() >= ctx.state.max_call_depth() {
        return Err(RuntimeError::Recursion);
    }
    let locals = bind_arguments(function, args, kwargs)?;
    ctx.state
        .stack
        .push_function(Rc::clone(&function.def), function.source, locals);
    ctx.fire(TraceEvent::Call);

    let result = exec_block(ctx, &function.def.body).map(|flow| match flow {
        StmtResult::Return(value) => value,
        _ => Value::None,
    });
    match &result {
        Ok(value) => ctx.fire(TraceEvent::Return(value)),
        Err(err) => ctx.fire(TraceEvent::Exception(err)),
    }
    ctx.state.stack.pop();
    result
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Bind call arguments to parameters, filling trailing defaults.
fn bind_arguments(
    function: &Function,
    args: Vec<Value>,
    kwargs: Vec<(SmolStr, Value)>,
) -> Result<IndexMap<SmolStr, Value>, RuntimeError> {
    let def = &function.def;
    let name = &def.name;
    let params = &def.params;

    if args.len() > params.len() {
        let required = def.required_params();
        let accepted = if required == params.len() {
            format!("{} positional argument{}", params.len(), plural(params.len()))
        } else {
            format!("from {required} to {} positional arguments", params.len())
        };
        let given = args.len();
        return Err(RuntimeError::type_error(format!(
            "{name}() takes {accepted} but {given} {} given",
            if given == 1 { "was" } else { "were" }
        )));
    }

    let mut slots: Vec<Option<Value>> = vec![None; params.len()];
    for (slot, arg) in slots.iter_mut().zip(args) {
        *slot = Some(arg);
    }
    for (keyword, value) in kwargs {
        let Some(position) = params.iter().position(|param| param.name == keyword) else {
            return Err(RuntimeError::type_error(format!(
                "{name}() got an unexpected keyword argument '{keyword}'"
            )));
        };
        if slots[position].is_some() {
            return Err(RuntimeError::type_error(format!(
                "{name}() got multiple values for argument '{keyword}'"
            )));
        }
        slots[position] = Some(value);
    }

    let first_default = params.len().saturating_sub(function.defaults.len());
    let mut locals = IndexMap::with_capacity(params.len());
    let mut missing = Vec::new();
    for (position, (param, slot)) in params.iter().zip(slots).enumerate() {
        let value = match slot {
            Some(value) => value,
            None if position >= first_default => function.defaults[position - first_default].clone(),
            None => {
                missing.push(format!("'{}'", param.name));
                continue;
            }
        };
        locals.insert(param.name.clone(), value);
    }
    if !missing.is_empty() {
        return Err(RuntimeError::type_error(format!(
            "{name}() missing {} required positional argument{}: {}",
            missing.len(),
            plural(missing.len()),
            join_names(&missing)
        )));
    }
    Ok(locals)
}

/// `'a'`, `'a' and 'b'`, `'a', 'b', and 'c'`.
fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}
