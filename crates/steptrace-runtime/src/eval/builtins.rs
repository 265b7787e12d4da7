//! Builtin functions and exception constructors.

#![allow(missing_docs)]
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use std::rc::Rc;

use smol_str::SmolStr;
use steptrace_syntax::ast::CompareOp;

use crate::error::RuntimeError;
use crate::eval::{call, ops, EvalContext};
use crate::value::{Dict, ExceptionValue, IterState, RangeValue, Value};

/// A builtin callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Print,
    Input,
    Len,
    Range,
    Enumerate,
    Zip,
    Reversed,
    Sorted,
    Sum,
    Min,
    Max,
    Abs,
    Str,
    Int,
    Float,
    Bool,
    List,
    Dict,
    Tuple,
    Repr,
    Exception,
    ValueError,
    TypeError,
    KeyError,
    IndexError,
    ZeroDivisionError,
    RuntimeError,
}

const ALL: [Builtin; 27] = [
    Builtin::Print,
    Builtin::Input,
    Builtin::Len,
    Builtin::Range,
    Builtin::Enumerate,
    Builtin::Zip,
    Builtin::Reversed,
    Builtin::Sorted,
    Builtin::Sum,
    Builtin::Min,
    Builtin::Max,
    Builtin::Abs,
    Builtin::Str,
    Builtin::Int,
    Builtin::Float,
    Builtin::Bool,
    Builtin::List,
    Builtin::Dict,
    Builtin::Tuple,
    Builtin::Repr,
    Builtin::Exception,
    Builtin::ValueError,
    Builtin::TypeError,
    Builtin::KeyError,
    Builtin::IndexError,
    Builtin::ZeroDivisionError,
    Builtin::RuntimeError,
];

impl Builtin {
    /// Resolve a builtin by the name traced code uses for it.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        ALL.iter().copied().find(|builtin| builtin.name() == name)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Input => "input",
            Builtin::Len => "len",
            Builtin::Range => "range",
            Builtin::Enumerate => "enumerate",
            Builtin::Zip => "zip",
            Builtin::Reversed => "reversed",
            Builtin::Sorted => "sorted",
            Builtin::Sum => "sum",
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::Abs => "abs",
            Builtin::Str => "str",
            Builtin::Int => "int",
            Builtin::Float => "float",
            Builtin::Bool => "bool",
            Builtin::List => "list",
            Builtin::Dict => "dict",
            Builtin::Tuple => "tuple",
            Builtin::Repr => "repr",
            Builtin::Exception => "Exception",
            Builtin::ValueError => "ValueError",
            Builtin::TypeError => "TypeError",
            Builtin::KeyError => "KeyError",
            Builtin::IndexError => "IndexError",
            Builtin::ZeroDivisionError => "ZeroDivisionError",
            Builtin::RuntimeError => "RuntimeError",
        }
    }

    /// Exception classes construct exception values when called.
    #[must_use]
    pub fn is_exception_class(self) -> bool {
        matches!(
            self,
            Builtin::Exception
                | Builtin::ValueError
                | Builtin::TypeError
                | Builtin::KeyError
                | Builtin::IndexError
                | Builtin::ZeroDivisionError
                | Builtin::RuntimeError
        )
    }

    /// Type conversions render as classes (`<class 'int'>`).
    #[must_use]
    pub fn is_class(self) -> bool {
        self.is_exception_class()
            || matches!(
                self,
                Builtin::Range
                    | Builtin::Enumerate
                    | Builtin::Zip
                    | Builtin::Reversed
                    | Builtin::Str
                    | Builtin::Int
                    | Builtin::Float
                    | Builtin::Bool
                    | Builtin::List
                    | Builtin::Dict
                    | Builtin::Tuple
            )
    }
}

/// Keyword arguments accepted by a builtin, removed as they are read.
struct Kwargs {
    function: &'static str,
    entries: Vec<(SmolStr, Value)>,
}

impl Kwargs {
    fn take(&mut self, name: &str) -> Option<Value> {
        let position = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(position).1)
    }

    /// Fail on any keyword that was not consumed.
    fn finish(self) -> Result<(), RuntimeError> {
        match self.entries.first() {
            Some((key, _)) => Err(RuntimeError::type_error(format!(
                "{}() got an unexpected keyword argument '{key}'",
                self.function
            ))),
            None => Ok(()),
        }
    }
}

fn arity(name: &str, args: &[Value], min: usize, max: usize) -> Result<(), RuntimeError> {
    let given = args.len();
    if (min..=max).contains(&given) {
        return Ok(());
    }
    let message = if min == 1 && max == 1 {
        format!("{name}() takes exactly one argument ({given} given)")
    } else if given < min {
        format!(
            "{name} expected at least {min} argument{}, got {given}",
            if min == 1 { "" } else { "s" }
        )
    } else {
        format!(
            "{name} expected at most {max} argument{}, got {given}",
            if max == 1 { "" } else { "s" }
        )
    };
    Err(RuntimeError::type_error(message))
}

fn integer_arg(value: &Value) -> Result<i64, RuntimeError> {
    value.as_int().ok_or_else(|| {
        RuntimeError::type_error(format!(
            "'{}' object cannot be interpreted as an integer",
            value.type_name()
        ))
    })
}

/// Invoke `builtin`.
pub fn call(
    ctx: &mut EvalContext<'_>,
    builtin: Builtin,
    args: Vec<Value>,
    kwargs: Vec<(SmolStr, Value)>,
) -> Result<Value, RuntimeError> {
    let name = builtin.name();
    let mut kwargs = Kwargs {
        function: name,
        entries: kwargs,
    };
    let result = match builtin {
        Builtin::Print => {
            let sep = string_kwarg(kwargs.take("sep"), "sep", " ")?;
            let end = string_kwarg(kwargs.take("end"), "end", "\n")?;
            kwargs.finish()?;
            let mut line = args
                .iter()
                .map(Value::to_str)
                .collect::<Vec<_>>()
                .join(&sep);
            line.push_str(&end);
            ctx.write_out(&line)?;
            return Ok(Value::None);
        }
        Builtin::Input => {
            arity(name, &args, 0, 1)?;
            Value::str(ctx.state.next_input())
        }
        Builtin::Len => {
            arity(name, &args, 1, 1)?;
            Value::Int(length(&args[0])?)
        }
        Builtin::Range => {
            let bounds = args.iter().map(integer_arg).collect::<Result<Vec<_>, _>>()?;
            let (start, stop, step) = match bounds.as_slice() {
                [stop] => (0, *stop, 1),
                [start, stop] => (*start, *stop, 1),
                [start, stop, step] => (*start, *stop, *step),
                _ => {
                    arity(name, &args, 1, 3)?;
                    return Ok(Value::None);
                }
            };
            if step == 0 {
                return Err(RuntimeError::value_error("range() arg 3 must not be zero"));
            }
            Value::Range(RangeValue { start, stop, step })
        }
        Builtin::Enumerate => {
            let start = kwargs.take("start");
            arity(name, &args, 1, 2)?;
            let start = match args.get(1).or(start.as_ref()) {
                Some(value) => integer_arg(value)?,
                None => 0,
            };
            Value::iterator(IterState::Enumerate {
                inner: ops::iterate(&args[0])?,
                count: start,
            })
        }
        Builtin::Zip => {
            let inners = args.iter().map(ops::iterate).collect::<Result<Vec<_>, _>>()?;
            Value::iterator(IterState::Zip(inners))
        }
        Builtin::Reversed => {
            arity(name, &args, 1, 1)?;
            reversed(&args[0])?
        }
        Builtin::Sorted => {
            arity(name, &args, 1, 1)?;
            let key = kwargs.take("key");
            let reverse = kwargs.take("reverse").is_some_and(|value| value.is_truthy());
            kwargs.finish()?;
            let items = ops::collect(&args[0])?;
            return Ok(Value::list(sort_values(ctx, items, key, reverse)?));
        }
        Builtin::Sum => {
            arity(name, &args, 1, 2)?;
            let start = kwargs.take("start");
            let mut total = args.get(1).cloned().or(start).unwrap_or(Value::Int(0));
            if matches!(total, Value::Str(_)) {
                return Err(RuntimeError::type_error(
                    "sum() can't sum strings [use ''.join(seq) instead]",
                ));
            }
            for item in ops::collect(&args[0])? {
                total = ops::binary_op(steptrace_syntax::ast::BinaryOp::Add, &total, &item)?;
            }
            total
        }
        Builtin::Min | Builtin::Max => {
            let key = kwargs.take("key");
            let default = kwargs.take("default");
            kwargs.finish()?;
            return extreme(ctx, builtin, args, key, default);
        }
        Builtin::Abs => {
            arity(name, &args, 1, 1)?;
            match &args[0] {
                Value::Float(value) => Value::Float(value.abs()),
                other => match other.as_int() {
                    Some(value) => Value::Int(value.checked_abs().ok_or_else(RuntimeError::overflow)?),
                    None => {
                        return Err(RuntimeError::type_error(format!(
                            "bad operand type for abs(): '{}'",
                            other.type_name()
                        )))
                    }
                },
            }
        }
        Builtin::Str => {
            arity(name, &args, 0, 1)?;
            Value::str(args.first().map(Value::to_str).unwrap_or_default())
        }
        Builtin::Repr => {
            arity(name, &args, 1, 1)?;
            Value::str(args[0].repr())
        }
        Builtin::Int => {
            arity(name, &args, 0, 1)?;
            args.first().map_or(Ok(Value::Int(0)), to_int)?
        }
        Builtin::Float => {
            arity(name, &args, 0, 1)?;
            args.first().map_or(Ok(Value::Float(0.0)), to_float)?
        }
        Builtin::Bool => {
            arity(name, &args, 0, 1)?;
            Value::Bool(args.first().is_some_and(Value::is_truthy))
        }
        Builtin::List => {
            arity(name, &args, 0, 1)?;
            match args.first() {
                Some(iterable) => Value::list(ops::collect(iterable)?),
                None => Value::list(Vec::new()),
            }
        }
        Builtin::Tuple => {
            arity(name, &args, 0, 1)?;
            match args.first() {
                Some(Value::Tuple(items)) => Value::Tuple(items.clone()),
                Some(iterable) => Value::tuple(ops::collect(iterable)?),
                None => Value::tuple(Vec::new()),
            }
        }
        Builtin::Dict => {
            arity(name, &args, 0, 1)?;
            let mut dict = match args.first() {
                Some(source) => dict_from(source)?,
                None => Dict::new(),
            };
            for (key, value) in std::mem::take(&mut kwargs.entries) {
                dict.insert_str(&key, value);
            }
            Value::dict(dict)
        }
        Builtin::Exception
        | Builtin::ValueError
        | Builtin::TypeError
        | Builtin::KeyError
        | Builtin::IndexError
        | Builtin::ZeroDivisionError
        | Builtin::RuntimeError => construct_exception(builtin, &args),
    };
    kwargs.finish()?;
    Ok(result)
}

fn string_kwarg(value: Option<Value>, name: &str, default: &str) -> Result<String, RuntimeError> {
    match value {
        None | Some(Value::None) => Ok(default.to_string()),
        Some(Value::Str(text)) => Ok(text.to_string()),
        Some(other) => Err(RuntimeError::type_error(format!(
            "{name} must be None or a string, not {}",
            other.type_name()
        ))),
    }
}

fn construct_exception(class: Builtin, args: &[Value]) -> Value {
    let message = match args {
        [] => String::new(),
        // KeyError renders its key the way it was looked up.
        [key] if class == Builtin::KeyError => key.repr(),
        [single] => single.to_str(),
        many => Value::tuple(many.to_vec()).repr(),
    };
    Value::Exception(Rc::new(ExceptionValue {
        class: SmolStr::new_static(class.name()),
        message: message.into(),
    }))
}

fn length(value: &Value) -> Result<i64, RuntimeError> {
    let len = match value {
        Value::Str(text) => text.chars().count(),
        Value::List(items) => items.borrow().len(),
        Value::Tuple(items) => items.len(),
        Value::Dict(dict) => dict.borrow().len(),
        Value::Range(range) => range.len(),
        other => {
            return Err(RuntimeError::type_error(format!(
                "object of type '{}' has no len()",
                other.type_name()
            )))
        }
    };
    i64::try_from(len).map_err(|_| RuntimeError::overflow())
}

fn reversed(value: &Value) -> Result<Value, RuntimeError> {
    let mut items = match value {
        Value::List(_) | Value::Tuple(_) | Value::Str(_) | Value::Dict(_) => ops::collect(value)?,
        Value::Range(range) => {
            let Some(last) = range.len().checked_sub(1).and_then(|i| range.get(i)) else {
                return Ok(Value::iterator(IterState::items(Vec::new())));
            };
            return Ok(Value::iterator(IterState::Range {
                next: last,
                stop: range.start.saturating_sub(range.step.signum()),
                step: -range.step,
            }));
        }
        other => {
            return Err(RuntimeError::type_error(format!(
                "'{}' object is not reversible",
                other.type_name()
            )))
        }
    };
    items.reverse();
    Ok(Value::iterator(IterState::items(items)))
}

fn to_int(value: &Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Float(number) => {
            if number.is_nan() {
                return Err(RuntimeError::value_error("cannot convert float NaN to integer"));
            }
            if number.is_infinite() {
                return Err(RuntimeError::Overflow(
                    "cannot convert float infinity to integer".into(),
                ));
            }
            let truncated = number.trunc();
            if truncated < i64::MIN as f64 || truncated >= 9_223_372_036_854_775_808.0 {
                return Err(RuntimeError::overflow());
            }
            Ok(Value::Int(truncated as i64))
        }
        Value::Str(text) => {
            let cleaned = text.trim().replace('_', "");
            cleaned.parse::<i64>().map(Value::Int).map_err(|_| {
                let digits = cleaned.trim_start_matches(['+', '-']);
                if !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit()) {
                    RuntimeError::overflow()
                } else {
                    RuntimeError::value_error(format!(
                        "invalid literal for int() with base 10: {}",
                        value.repr()
                    ))
                }
            })
        }
        other => other.as_int().map(Value::Int).ok_or_else(|| {
            RuntimeError::type_error(format!(
                "int() argument must be a string, a bytes-like object or a real number, not '{}'",
                other.type_name()
            ))
        }),
    }
}

fn to_float(value: &Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Float(number) => Ok(Value::Float(*number)),
        Value::Str(text) => text
            .trim()
            .replace('_', "")
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| {
                RuntimeError::value_error(format!(
                    "could not convert string to float: {}",
                    value.repr()
                ))
            }),
        other => other.as_int().map(|n| Value::Float(n as f64)).ok_or_else(|| {
            RuntimeError::type_error(format!(
                "float() argument must be a string or a real number, not '{}'",
                other.type_name()
            ))
        }),
    }
}

fn dict_from(source: &Value) -> Result<Dict, RuntimeError> {
    if let Value::Dict(existing) = source {
        let mut dict = Dict::new();
        for (key, value) in existing.borrow().items() {
            dict.insert(key.clone(), value.clone())?;
        }
        return Ok(dict);
    }
    let mut dict = Dict::new();
    for (position, item) in ops::collect(source)?.into_iter().enumerate() {
        let pair = ops::collect(&item).map_err(|_| {
            RuntimeError::type_error(format!(
                "cannot convert dictionary update sequence element #{position} to a sequence"
            ))
        })?;
        let [key, value] = <[Value; 2]>::try_from(pair).map_err(|pair| {
            RuntimeError::value_error(format!(
                "dictionary update sequence element #{position} has length {}; 2 is required",
                pair.len()
            ))
        })?;
        dict.insert(key, value)?;
    }
    Ok(dict)
}

/// Sort `items` with `<`, optionally through a key function.
///
/// Stable, and `reverse` keeps equal elements in their original order.
pub(crate) fn sort_values(
    ctx: &mut EvalContext<'_>,
    items: Vec<Value>,
    key: Option<Value>,
    reverse: bool,
) -> Result<Vec<Value>, RuntimeError> {
    let mut keyed = Vec::with_capacity(items.len());
    for item in items {
        let sort_key = match &key {
            Some(Value::None) | None => item.clone(),
            Some(function) => call::call_value(ctx, function, vec![item.clone()], Vec::new())?,
        };
        keyed.push((sort_key, item));
    }
    if reverse {
        keyed.reverse();
    }
    merge_sort(&mut keyed, |a, b| ops::less_than(&a.0, &b.0))?;
    if reverse {
        keyed.reverse();
    }
    Ok(keyed.into_iter().map(|(_, item)| item).collect())
}

/// Bottom-up stable merge sort driven by a fallible `less` predicate.
fn merge_sort<T: Clone>(
    items: &mut Vec<T>,
    mut less: impl FnMut(&T, &T) -> Result<bool, RuntimeError>,
) -> Result<(), RuntimeError> {
    let len = items.len();
    let mut width = 1;
    let mut merged = Vec::with_capacity(len);
    while width < len {
        merged.clear();
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut left, mut right) = (start, mid);
            while left < mid && right < end {
                if less(&items[right], &items[left])? {
                    merged.push(items[right].clone());
                    right += 1;
                } else {
                    merged.push(items[left].clone());
                    left += 1;
                }
            }
            merged.extend_from_slice(&items[left..mid]);
            merged.extend_from_slice(&items[right..end]);
            start = end;
        }
        std::mem::swap(items, &mut merged);
        width *= 2;
    }
    Ok(())
}

/// `min`/`max` over one iterable or several positional arguments.
fn extreme(
    ctx: &mut EvalContext<'_>,
    builtin: Builtin,
    args: Vec<Value>,
    key: Option<Value>,
    default: Option<Value>,
) -> Result<Value, RuntimeError> {
    let name = builtin.name();
    let candidates = match args.len() {
        0 => {
            return Err(RuntimeError::type_error(format!(
                "{name} expected at least 1 argument, got 0"
            )))
        }
        1 => ops::collect(&args[0])?,
        _ => {
            if default.is_some() {
                return Err(RuntimeError::type_error(format!(
                    "Cannot specify a default for {name}() with multiple positional arguments"
                )));
            }
            args
        }
    };
    let op = if builtin == Builtin::Min {
        CompareOp::Lt
    } else {
        CompareOp::Gt
    };
    let mut best: Option<(Value, Value)> = None;
    for item in candidates {
        let item_key = match &key {
            Some(Value::None) | None => item.clone(),
            Some(function) => call::call_value(ctx, function, vec![item.clone()], Vec::new())?,
        };
        let replace = match &best {
            None => true,
            Some((best_key, _)) => ops::compare(op, &item_key, best_key)?,
        };
        if replace {
            best = Some((item_key, item));
        }
    }
    match best {
        Some((_, item)) => Ok(item),
        None => default.ok_or_else(|| {
            RuntimeError::value_error(format!("{name}() arg is an empty sequence"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        assert_eq!(Builtin::lookup("len"), Some(Builtin::Len));
        assert_eq!(Builtin::lookup("ValueError"), Some(Builtin::ValueError));
        assert_eq!(Builtin::lookup("exec"), None);
        for builtin in ALL {
            assert_eq!(Builtin::lookup(builtin.name()), Some(builtin));
        }
    }

    #[test]
    fn merge_sort_is_stable() {
        let mut pairs = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];
        merge_sort(&mut pairs, |a, b| Ok(a.0 < b.0)).unwrap();
        assert_eq!(pairs, vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn int_conversion() {
        assert_eq!(to_int(&Value::str(" 42 ")).unwrap().repr(), "42");
        assert_eq!(to_int(&Value::Float(-2.7)).unwrap().repr(), "-2");
        let err = to_int(&Value::str("abc")).unwrap_err();
        assert_eq!(
            err.describe(),
            "ValueError: invalid literal for int() with base 10: 'abc'"
        );
    }

    #[test]
    fn key_error_message_is_the_key_repr() {
        let value = construct_exception(Builtin::KeyError, &[Value::str("k")]);
        let Value::Exception(exception) = value else {
            panic!("expected an exception value");
        };
        assert_eq!(exception.message, "'k'");
    }
}
