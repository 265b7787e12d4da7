//! Methods of the builtin container and string types.

#![allow(missing_docs)]

use std::rc::Rc;

use smol_str::SmolStr;

use crate::error::RuntimeError;
use crate::eval::builtins::sort_values;
use crate::eval::{ops, EvalContext};
use crate::value::{BoundMethod, Value};

const LIST_METHODS: &[&str] = &[
    "append", "pop", "insert", "extend", "index", "count", "reverse", "sort",
];
const DICT_METHODS: &[&str] = &["get", "keys", "values", "items", "pop", "setdefault"];
const STR_METHODS: &[&str] = &[
    "upper",
    "lower",
    "strip",
    "split",
    "join",
    "startswith",
    "endswith",
    "replace",
    "find",
];

fn methods_of(receiver: &Value) -> &'static [&'static str] {
    match receiver {
        Value::List(_) => LIST_METHODS,
        Value::Dict(_) => DICT_METHODS,
        Value::Str(_) => STR_METHODS,
        _ => &[],
    }
}

/// Resolve `receiver.attr` to a bound method.
pub fn bind(receiver: Value, attr: &SmolStr) -> Result<Value, RuntimeError> {
    if !methods_of(&receiver).contains(&attr.as_str()) {
        return Err(RuntimeError::Attribute(
            format!(
                "'{}' object has no attribute '{attr}'",
                receiver.type_name()
            )
            .into(),
        ));
    }
    Ok(Value::BoundMethod(Rc::new(BoundMethod {
        receiver,
        name: attr.clone(),
    })))
}

fn expect_args(
    owner: &str,
    name: &str,
    args: &[Value],
    min: usize,
    max: usize,
) -> Result<(), RuntimeError> {
    let given = args.len();
    if (min..=max).contains(&given) {
        return Ok(());
    }
    let message = match (min, max) {
        (0, 0) => format!("{owner}.{name}() takes no arguments ({given} given)"),
        (1, 1) => format!("{owner}.{name}() takes exactly one argument ({given} given)"),
        _ if given < min => format!("{name} expected at least {min} arguments, got {given}"),
        _ => format!(
            "{name} expected at most {max} argument{}, got {given}",
            if max == 1 { "" } else { "s" }
        ),
    };
    Err(RuntimeError::type_error(message))
}

/// Invoke method `name` on `receiver`.
pub fn call_method(
    ctx: &mut EvalContext<'_>,
    receiver: &Value,
    name: &SmolStr,
    args: Vec<Value>,
    mut kwargs: Vec<(SmolStr, Value)>,
) -> Result<Value, RuntimeError> {
    let owner = receiver.type_name().to_string();
    if let (Value::List(_), "sort") = (receiver, name.as_str()) {
        expect_args(&owner, name, &args, 0, 0)?;
        let mut take = |key: &str| {
            kwargs
                .iter()
                .position(|(name, _)| name == key)
                .map(|position| kwargs.remove(position).1)
        };
        let key = take("key");
        let reverse = take("reverse").is_some_and(|value| value.is_truthy());
        if let Some((unexpected, _)) = kwargs.first() {
            return Err(RuntimeError::type_error(format!(
                "sort() got an unexpected keyword argument '{unexpected}'"
            )));
        }
        return list_sort(ctx, receiver, key, reverse);
    }
    if !kwargs.is_empty() {
        return Err(RuntimeError::type_error(format!(
            "{owner}.{name}() takes no keyword arguments"
        )));
    }
    match receiver {
        Value::List(_) => list_method(receiver, &owner, name, &args),
        Value::Dict(_) => dict_method(receiver, &owner, name, &args),
        Value::Str(text) => str_method(text, &owner, name, &args),
        other => Err(RuntimeError::Attribute(
            format!("'{}' object has no attribute '{name}'", other.type_name()).into(),
        )),
    }
}

fn list_sort(
    ctx: &mut EvalContext<'_>,
    receiver: &Value,
    key: Option<Value>,
    reverse: bool,
) -> Result<Value, RuntimeError> {
    let Value::List(list) = receiver else {
        return Ok(Value::None);
    };
    let items = list.borrow().clone();
    let sorted = sort_values(ctx, items, key, reverse)?;
    *list.borrow_mut() = sorted;
    Ok(Value::None)
}

fn list_method(
    receiver: &Value,
    owner: &str,
    name: &str,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let Value::List(list) = receiver else {
        return Ok(Value::None);
    };
    match name {
        "append" => {
            expect_args(owner, name, args, 1, 1)?;
            list.borrow_mut().push(args[0].clone());
            Ok(Value::None)
        }
        "extend" => {
            expect_args(owner, name, args, 1, 1)?;
            let extra = ops::collect(&args[0])?;
            list.borrow_mut().extend(extra);
            Ok(Value::None)
        }
        "pop" => {
            expect_args(owner, name, args, 0, 1)?;
            let mut items = list.borrow_mut();
            if items.is_empty() {
                return Err(RuntimeError::index_error("pop from empty list"));
            }
            let index = match args.first() {
                Some(index) => int_arg(index)?,
                None => -1,
            };
            let len = i64::try_from(items.len()).map_err(|_| RuntimeError::overflow())?;
            let resolved = if index < 0 { index + len } else { index };
            let position = usize::try_from(resolved)
                .ok()
                .filter(|position| *position < items.len())
                .ok_or_else(|| RuntimeError::index_error("pop index out of range"))?;
            Ok(items.remove(position))
        }
        "insert" => {
            expect_args(owner, name, args, 2, 2)?;
            let index = int_arg(&args[0])?;
            let mut items = list.borrow_mut();
            let len = i64::try_from(items.len()).map_err(|_| RuntimeError::overflow())?;
            let resolved = if index < 0 { (index + len).max(0) } else { index.min(len) };
            let position = usize::try_from(resolved).unwrap_or(0);
            items.insert(position, args[1].clone());
            Ok(Value::None)
        }
        "index" => {
            expect_args(owner, name, args, 1, 1)?;
            let items = list.borrow().clone();
            for (position, item) in items.iter().enumerate() {
                if ops::equals(item, &args[0])? {
                    return Ok(Value::Int(
                        i64::try_from(position).map_err(|_| RuntimeError::overflow())?,
                    ));
                }
            }
            Err(RuntimeError::value_error(format!(
                "{} is not in list",
                args[0].repr()
            )))
        }
        "count" => {
            expect_args(owner, name, args, 1, 1)?;
            let items = list.borrow().clone();
            let mut count = 0;
            for item in &items {
                if ops::equals(item, &args[0])? {
                    count += 1;
                }
            }
            Ok(Value::Int(count))
        }
        "reverse" => {
            expect_args(owner, name, args, 0, 0)?;
            list.borrow_mut().reverse();
            Ok(Value::None)
        }
        _ => Err(no_attribute(owner, name)),
    }
}

fn dict_method(
    receiver: &Value,
    owner: &str,
    name: &str,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let Value::Dict(dict) = receiver else {
        return Ok(Value::None);
    };
    match name {
        "get" => {
            expect_args(owner, name, args, 1, 2)?;
            let found = dict.borrow().get(&args[0])?;
            Ok(found.unwrap_or_else(|| args.get(1).cloned().unwrap_or(Value::None)))
        }
        "keys" => {
            expect_args(owner, name, args, 0, 0)?;
            Ok(Value::list(dict.borrow().keys().cloned().collect()))
        }
        "values" => {
            expect_args(owner, name, args, 0, 0)?;
            Ok(Value::list(dict.borrow().values().cloned().collect()))
        }
        "items" => {
            expect_args(owner, name, args, 0, 0)?;
            Ok(Value::list(
                dict.borrow()
                    .items()
                    .map(|(key, value)| Value::tuple(vec![key.clone(), value.clone()]))
                    .collect(),
            ))
        }
        "pop" => {
            expect_args(owner, name, args, 1, 2)?;
            let removed = dict.borrow_mut().remove(&args[0])?;
            match (removed, args.get(1)) {
                (Some(value), _) => Ok(value),
                (None, Some(default)) => Ok(default.clone()),
                (None, None) => Err(RuntimeError::Key(args[0].repr().into())),
            }
        }
        "setdefault" => {
            expect_args(owner, name, args, 1, 2)?;
            if let Some(existing) = dict.borrow().get(&args[0])? {
                return Ok(existing);
            }
            let default = args.get(1).cloned().unwrap_or(Value::None);
            dict.borrow_mut().insert(args[0].clone(), default.clone())?;
            Ok(default)
        }
        _ => Err(no_attribute(owner, name)),
    }
}

fn str_method(
    text: &SmolStr,
    owner: &str,
    name: &str,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    match name {
        "upper" => {
            expect_args(owner, name, args, 0, 0)?;
            Ok(Value::str(text.to_uppercase()))
        }
        "lower" => {
            expect_args(owner, name, args, 0, 0)?;
            Ok(Value::str(text.to_lowercase()))
        }
        "strip" => {
            expect_args(owner, name, args, 0, 1)?;
            match args.first() {
                None | Some(Value::None) => Ok(Value::str(text.trim())),
                Some(chars) => {
                    let chars = str_arg(chars)?;
                    Ok(Value::str(text.trim_matches(|ch: char| chars.contains(ch))))
                }
            }
        }
        "split" => {
            expect_args(owner, name, args, 0, 2)?;
            let limit = match args.get(1) {
                Some(limit) => usize::try_from(int_arg(limit)?).ok(),
                None => None,
            };
            let parts: Vec<Value> = match args.first() {
                None | Some(Value::None) => split_whitespace(text, limit),
                Some(separator) => {
                    let separator = str_arg(separator)?;
                    if separator.is_empty() {
                        return Err(RuntimeError::value_error("empty separator"));
                    }
                    match limit {
                        Some(limit) => text.splitn(limit + 1, separator.as_str()).map(Value::str).collect(),
                        None => text.split(separator.as_str()).map(Value::str).collect(),
                    }
                }
            };
            Ok(Value::list(parts))
        }
        "join" => {
            expect_args(owner, name, args, 1, 1)?;
            let mut pieces = Vec::new();
            for (position, item) in ops::collect(&args[0])?.into_iter().enumerate() {
                match item {
                    Value::Str(piece) => pieces.push(piece),
                    other => {
                        return Err(RuntimeError::type_error(format!(
                            "sequence item {position}: expected str instance, {} found",
                            other.type_name()
                        )))
                    }
                }
            }
            Ok(Value::str(pieces.join(text.as_str())))
        }
        "startswith" | "endswith" => {
            expect_args(owner, name, args, 1, 1)?;
            let candidates = match &args[0] {
                Value::Tuple(items) => items.iter().map(str_arg).collect::<Result<Vec<_>, _>>()?,
                other => vec![str_arg(other)?],
            };
            let matched = candidates.iter().any(|candidate| {
                if name == "startswith" {
                    text.starts_with(candidate.as_str())
                } else {
                    text.ends_with(candidate.as_str())
                }
            });
            Ok(Value::Bool(matched))
        }
        "replace" => {
            expect_args(owner, name, args, 2, 3)?;
            let old = str_arg(&args[0])?;
            let new = str_arg(&args[1])?;
            let count = match args.get(2) {
                Some(count) => usize::try_from(int_arg(count)?).ok(),
                None => None,
            };
            Ok(Value::str(match count {
                Some(count) => text.replacen(old.as_str(), new.as_str(), count),
                None => text.replace(old.as_str(), new.as_str()),
            }))
        }
        "find" => {
            expect_args(owner, name, args, 1, 1)?;
            let needle = str_arg(&args[0])?;
            let position = text
                .find(needle.as_str())
                .map_or(-1, |byte| {
                    i64::try_from(text[..byte].chars().count()).unwrap_or(i64::MAX)
                });
            Ok(Value::Int(position))
        }
        _ => Err(no_attribute(owner, name)),
    }
}

/// Whitespace split with an optional limit on the number of splits.
fn split_whitespace(text: &str, limit: Option<usize>) -> Vec<Value> {
    let Some(limit) = limit else {
        return text.split_whitespace().map(Value::str).collect();
    };
    let mut parts = Vec::new();
    let mut rest = text.trim_start();
    while !rest.is_empty() {
        if parts.len() == limit {
            parts.push(Value::str(rest));
            break;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        parts.push(Value::str(&rest[..end]));
        rest = rest[end..].trim_start();
    }
    parts
}

fn str_arg(value: &Value) -> Result<SmolStr, RuntimeError> {
    match value {
        Value::Str(text) => Ok(text.clone()),
        other => Err(RuntimeError::type_error(format!(
            "must be str, not {}",
            other.type_name()
        ))),
    }
}

fn int_arg(value: &Value) -> Result<i64, RuntimeError> {
    value.as_int().ok_or_else(|| {
        RuntimeError::type_error(format!(
            "'{}' object cannot be interpreted as an integer",
            value.type_name()
        ))
    })
}

fn no_attribute(owner: &str, name: &str) -> RuntimeError {
    RuntimeError::Attribute(format!("'{owner}' object has no attribute '{name}'").into())
}
