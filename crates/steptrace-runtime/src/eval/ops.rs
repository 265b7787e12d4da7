//! Operators, comparisons, indexing and iteration.

#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use std::cmp::Ordering;
use std::rc::Rc;

use steptrace_syntax::ast::{BinaryOp, CompareOp};

use crate::error::RuntimeError;
use crate::value::{format_float, IterRef, IterState, RangeValue, Value};

/// Nesting limit for structural equality.
const MAX_COMPARE_DEPTH: usize = 200;

/// Sequence repetition larger than this is refused.
const MAX_REPEAT_LEN: usize = 1 << 24;

#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(value) => Some(Num::Int(i64::from(*value))),
            Value::Int(value) => Some(Num::Int(*value)),
            Value::Float(value) => Some(Num::Float(*value)),
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(value) => value as f64,
            Num::Float(value) => value,
        }
    }
}

fn unsupported(symbol: &str, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::type_error(format!(
        "unsupported operand type(s) for {symbol}: '{}' and '{}'",
        left.type_name(),
        right.type_name()
    ))
}

/// Evaluate `left <op> right`.
pub fn binary_op(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    if let (Some(a), Some(b)) = (Num::of(left), Num::of(right)) {
        return arith(op, a, b);
    }
    match (op, left, right) {
        (BinaryOp::Add, Value::Str(a), Value::Str(b)) => {
            let mut text = String::with_capacity(a.len() + b.len());
            text.push_str(a);
            text.push_str(b);
            Ok(Value::str(text))
        }
        (BinaryOp::Add, Value::List(a), Value::List(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        (BinaryOp::Add, Value::Tuple(a), Value::Tuple(b)) => {
            Ok(Value::tuple(a.iter().chain(b.iter()).cloned().collect()))
        }
        (BinaryOp::Add, Value::Str(_) | Value::List(_) | Value::Tuple(_), other) => {
            Err(RuntimeError::type_error(format!(
                "can only concatenate {} (not \"{}\") to {}",
                left.type_name(),
                other.type_name(),
                left.type_name()
            )))
        }
        (BinaryOp::Mul, sequence, count) | (BinaryOp::Mul, count, sequence)
            if is_sequence(sequence) && count.as_int().is_some() =>
        {
            repeat(sequence, count.as_int().unwrap_or(0))
        }
        (BinaryOp::Mod, Value::Str(template), args) => format_percent(template, args),
        _ => Err(unsupported(op.symbol(), left, right)),
    }
}

/// Augmented assignment: lists are extended/repeated in place.
pub fn inplace_op(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match (op, left) {
        (BinaryOp::Add, Value::List(items)) => {
            let extra = collect(right)?;
            items.borrow_mut().extend(extra);
            Ok(left.clone())
        }
        (BinaryOp::Mul, Value::List(items)) if right.as_int().is_some() => {
            let repeated = repeat(left, right.as_int().unwrap_or(0))?;
            if let Value::List(new_items) = repeated {
                let new_items = new_items.borrow().clone();
                *items.borrow_mut() = new_items;
            }
            Ok(left.clone())
        }
        _ => binary_op(op, left, right),
    }
}

fn is_sequence(value: &Value) -> bool {
    matches!(value, Value::Str(_) | Value::List(_) | Value::Tuple(_))
}

fn repeat(sequence: &Value, count: i64) -> Result<Value, RuntimeError> {
    let count = usize::try_from(count).unwrap_or(0);
    let len = match sequence {
        Value::Str(text) => text.len(),
        Value::List(items) => items.borrow().len(),
        Value::Tuple(items) => items.len(),
        _ => 0,
    };
    if len.saturating_mul(count) > MAX_REPEAT_LEN {
        return Err(RuntimeError::Overflow("repeated sequence is too long".into()));
    }
    Ok(match sequence {
        Value::Str(text) => Value::str(text.repeat(count)),
        Value::List(items) => {
            let items = items.borrow();
            Value::list(items.iter().cloned().cycle().take(items.len() * count).collect())
        }
        Value::Tuple(items) => {
            Value::tuple(items.iter().cloned().cycle().take(items.len() * count).collect())
        }
        other => other.clone(),
    })
}

fn arith(op: BinaryOp, a: Num, b: Num) -> Result<Value, RuntimeError> {
    match (a, b) {
        (Num::Int(a), Num::Int(b)) => int_arith(op, a, b),
        _ => float_arith(op, a.as_f64(), b.as_f64()),
    }
}

fn int_arith(op: BinaryOp, a: i64, b: i64) -> Result<Value, RuntimeError> {
    let checked = |result: Option<i64>| result.map(Value::Int).ok_or_else(RuntimeError::overflow);
    match op {
        BinaryOp::Add => checked(a.checked_add(b)),
        BinaryOp::Sub => checked(a.checked_sub(b)),
        BinaryOp::Mul => checked(a.checked_mul(b)),
        BinaryOp::Div => {
            if b == 0 {
                return Err(RuntimeError::ZeroDivision("division by zero".into()));
            }
            Ok(Value::Float(a as f64 / b as f64))
        }
        BinaryOp::FloorDiv | BinaryOp::Mod => {
            if b == 0 {
                return Err(RuntimeError::ZeroDivision(
                    "integer division or modulo by zero".into(),
                ));
            }
            let quotient = a.checked_div(b).ok_or_else(RuntimeError::overflow)?;
            let remainder = a % b;
            let adjust = remainder != 0 && ((remainder < 0) != (b < 0));
            if op == BinaryOp::FloorDiv {
                Ok(Value::Int(if adjust { quotient - 1 } else { quotient }))
            } else {
                Ok(Value::Int(if adjust { remainder + b } else { remainder }))
            }
        }
        BinaryOp::Pow => {
            if b < 0 {
                if a == 0 {
                    return Err(RuntimeError::ZeroDivision(
                        "0.0 cannot be raised to a negative power".into(),
                    ));
                }
                return Ok(Value::Float((a as f64).powf(b as f64)));
            }
            let exponent = u32::try_from(b).map_err(|_| RuntimeError::overflow())?;
            checked(a.checked_pow(exponent))
        }
    }
}

#[allow(clippy::float_cmp)]
fn float_arith(op: BinaryOp, a: f64, b: f64) -> Result<Value, RuntimeError> {
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(RuntimeError::ZeroDivision("float division by zero".into()));
            }
            a / b
        }
        BinaryOp::FloorDiv => {
            if b == 0.0 {
                return Err(RuntimeError::ZeroDivision(
                    "float floor division by zero".into(),
                ));
            }
            (a / b).floor()
        }
        BinaryOp::Mod => {
            if b == 0.0 {
                return Err(RuntimeError::ZeroDivision("float modulo".into()));
            }
            let remainder = a % b;
            if remainder != 0.0 && ((remainder < 0.0) != (b < 0.0)) {
                remainder + b
            } else {
                remainder
            }
        }
        BinaryOp::Pow => {
            if a == 0.0 && b < 0.0 {
                return Err(RuntimeError::ZeroDivision(
                    "0.0 cannot be raised to a negative power".into(),
                ));
            }
            if a < 0.0 && b.fract() != 0.0 {
                return Err(RuntimeError::value_error("math domain error"));
            }
            let result = a.powf(b);
            if result.is_infinite() && a.is_finite() && b.is_finite() {
                return Err(RuntimeError::Overflow("numerical result out of range".into()));
            }
            result
        }
    };
    Ok(Value::Float(result))
}

pub fn negate(value: &Value) -> Result<Value, RuntimeError> {
    match Num::of(value) {
        Some(Num::Int(v)) => v.checked_neg().map(Value::Int).ok_or_else(RuntimeError::overflow),
        Some(Num::Float(v)) => Ok(Value::Float(-v)),
        None => Err(RuntimeError::type_error(format!(
            "bad operand type for unary -: '{}'",
            value.type_name()
        ))),
    }
}

pub fn positive(value: &Value) -> Result<Value, RuntimeError> {
    match Num::of(value) {
        Some(Num::Int(v)) => Ok(Value::Int(v)),
        Some(Num::Float(v)) => Ok(Value::Float(v)),
        None => Err(RuntimeError::type_error(format!(
            "bad operand type for unary +: '{}'",
            value.type_name()
        ))),
    }
}

/// Evaluate a single comparison link.
pub fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, RuntimeError> {
    match op {
        CompareOp::Eq => equals(left, right),
        CompareOp::NotEq => Ok(!equals(left, right)?),
        CompareOp::Lt | CompareOp::LtEq | CompareOp::Gt | CompareOp::GtEq => {
            ordered(op, left, right)
        }
        CompareOp::In => contains(right, left),
        CompareOp::NotIn => Ok(!contains(right, left)?),
        CompareOp::Is => Ok(identical(left, right)),
        CompareOp::IsNot => Ok(!identical(left, right)),
    }
}

/// `left < right`, as used by sorting, `min` and `max`.
pub fn less_than(left: &Value, right: &Value) -> Result<bool, RuntimeError> {
    ordered(CompareOp::Lt, left, right)
}

fn ordered(op: CompareOp, left: &Value, right: &Value) -> Result<bool, RuntimeError> {
    let ordering = match (left, right) {
        (Value::Str(a), Value::Str(b)) => Some(a.as_str().cmp(b.as_str())),
        (Value::List(a), Value::List(b)) => {
            let (a, b) = (a.borrow().clone(), b.borrow().clone());
            return ordered_sequences(op, &a, &b);
        }
        (Value::Tuple(a), Value::Tuple(b)) => return ordered_sequences(op, a, b),
        _ => match (Num::of(left), Num::of(right)) {
            (Some(Num::Int(a)), Some(Num::Int(b))) => Some(a.cmp(&b)),
            (Some(a), Some(b)) => a.as_f64().partial_cmp(&b.as_f64()),
            _ => {
                return Err(RuntimeError::type_error(format!(
                    "'{}' not supported between instances of '{}' and '{}'",
                    op.symbol(),
                    left.type_name(),
                    right.type_name()
                )))
            }
        },
    };
    // Unordered floats (NaN) compare false for every operator.
    Ok(ordering.is_some_and(|ordering| match op {
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::LtEq => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    }))
}

fn ordered_sequences(op: CompareOp, a: &[Value], b: &[Value]) -> Result<bool, RuntimeError> {
    for (x, y) in a.iter().zip(b) {
        if !equals(x, y)? {
            return ordered(op, x, y);
        }
    }
    ordered(
        op,
        &Value::Int(a.len() as i64),
        &Value::Int(b.len() as i64),
    )
}

/// Structural equality (`==`).
pub fn equals(left: &Value, right: &Value) -> Result<bool, RuntimeError> {
    equals_at(left, right, 0)
}

#[allow(clippy::float_cmp)]
fn equals_at(left: &Value, right: &Value, depth: usize) -> Result<bool, RuntimeError> {
    if depth > MAX_COMPARE_DEPTH {
        return Err(RuntimeError::Recursion);
    }
    if let (Some(a), Some(b)) = (Num::of(left), Num::of(right)) {
        return Ok(match (a, b) {
            (Num::Int(a), Num::Int(b)) => a == b,
            (Num::Int(i), Num::Float(f)) | (Num::Float(f), Num::Int(i)) => {
                f.fract() == 0.0 && f >= i64::MIN as f64 && f < 9_223_372_036_854_775_808.0 && f as i64 == i
            }
            (Num::Float(a), Num::Float(b)) => a == b,
        });
    }
    Ok(match (left, right) {
        (Value::None, Value::None) => true,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            if a.ptr_eq(b) {
                return Ok(true);
            }
            let (a, b) = (a.borrow(), b.borrow());
            sequences_equal(&a, &b, depth)?
        }
        (Value::Tuple(a), Value::Tuple(b)) => sequences_equal(a, b, depth)?,
        (Value::Dict(a), Value::Dict(b)) => {
            if a.ptr_eq(b) {
                return Ok(true);
            }
            let (a, b) = (a.borrow(), b.borrow());
            if a.len() != b.len() {
                return Ok(false);
            }
            for (key, value) in a.items() {
                match b.get(key)? {
                    Some(other) if equals_at(value, &other, depth + 1)? => {}
                    _ => return Ok(false),
                }
            }
            true
        }
        (Value::Range(a), Value::Range(b)) => {
            a == b || (a.is_empty() && b.is_empty())
                || (a.len() == b.len() && a.start == b.start && (a.len() == 1 || a.step == b.step))
        }
        (Value::Builtin(a), Value::Builtin(b)) => a == b,
        (Value::Exception(a), Value::Exception(b)) => Rc::ptr_eq(a, b),
        _ => identical(left, right),
    })
}

fn sequences_equal(a: &[Value], b: &[Value], depth: usize) -> Result<bool, RuntimeError> {
    if a.len() != b.len() {
        return Ok(false);
    }
    for (x, y) in a.iter().zip(b) {
        if !equals_at(x, y, depth + 1)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Object identity (`is`). Scalars compare by value.
#[must_use]
pub fn identical(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::None, Value::None) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::List(a), Value::List(b)) => a.ptr_eq(b),
        (Value::Tuple(a), Value::Tuple(b)) => a.ptr_eq(b),
        (Value::Dict(a), Value::Dict(b)) => a.ptr_eq(b),
        (Value::Range(a), Value::Range(b)) => a == b,
        (Value::Iterator(a), Value::Iterator(b)) => Rc::ptr_eq(a, b),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Builtin(a), Value::Builtin(b)) => a == b,
        (Value::BoundMethod(a), Value::BoundMethod(b)) => Rc::ptr_eq(a, b),
        (Value::Exception(a), Value::Exception(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

/// Membership test (`item in container`).
pub fn contains(container: &Value, item: &Value) -> Result<bool, RuntimeError> {
    match container {
        Value::List(items) => {
            let items = items.borrow().clone();
            any_equal(&items, item)
        }
        Value::Tuple(items) => any_equal(items, item),
        Value::Str(text) => match item {
            Value::Str(needle) => Ok(text.contains(needle.as_str())),
            other => Err(RuntimeError::type_error(format!(
                "'in <string>' requires string as left operand, not {}",
                other.type_name()
            ))),
        },
        Value::Dict(dict) => dict.borrow().contains(item),
        Value::Range(range) => Ok(match Num::of(item) {
            Some(Num::Int(value)) => range.contains(value),
            Some(Num::Float(value)) => {
                value.fract() == 0.0 && range.contains(value as i64)
            }
            None => false,
        }),
        Value::Iterator(state) => loop {
            let next = state.borrow_mut().next_value();
            match next {
                Some(candidate) if equals(&candidate, item)? => break Ok(true),
                Some(_) => {}
                None => break Ok(false),
            }
        },
        other => Err(RuntimeError::type_error(format!(
            "argument of type '{}' is not iterable",
            other.type_name()
        ))),
    }
}

fn any_equal(items: &[Value], item: &Value) -> Result<bool, RuntimeError> {
    for candidate in items {
        if identical(candidate, item) || equals(candidate, item)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn index_of(value: &Value, container: &Value) -> Result<i64, RuntimeError> {
    value.as_int().ok_or_else(|| {
        RuntimeError::type_error(format!(
            "{} indices must be integers or slices, not {}",
            container.type_name(),
            value.type_name()
        ))
    })
}

/// Resolve a possibly negative index against `len`.
fn normalize(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let index = if index < 0 { index + len } else { index };
    if (0..len).contains(&index) {
        usize::try_from(index).ok()
    } else {
        None
    }
}

/// `container[index]`.
pub fn get_item(container: &Value, index: &Value) -> Result<Value, RuntimeError> {
    match container {
        Value::List(items) => {
            let position = index_of(index, container)?;
            let items = items.borrow();
            normalize(position, items.len())
                .map(|i| items[i].clone())
                .ok_or_else(|| RuntimeError::index_error("list index out of range"))
        }
        Value::Tuple(items) => {
            let position = index_of(index, container)?;
            normalize(position, items.len())
                .map(|i| items[i].clone())
                .ok_or_else(|| RuntimeError::index_error("tuple index out of range"))
        }
        Value::Str(text) => {
            let position = index_of(index, container)?;
            let count = text.chars().count();
            normalize(position, count)
                .and_then(|i| text.chars().nth(i))
                .map(|ch| Value::str(ch.to_string()))
                .ok_or_else(|| RuntimeError::index_error("string index out of range"))
        }
        Value::Range(range) => {
            let position = index_of(index, container)?;
            normalize(position, range.len())
                .and_then(|i| range.get(i))
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::index_error("range object index out of range"))
        }
        Value::Dict(dict) => dict
            .borrow()
            .get(index)?
            .ok_or_else(|| RuntimeError::Key(index.repr().into())),
        other => Err(RuntimeError::type_error(format!(
            "'{}' object is not subscriptable",
            other.type_name()
        ))),
    }
}

/// `container[index] = value`.
pub fn set_item(container: &Value, index: Value, value: Value) -> Result<(), RuntimeError> {
    match container {
        Value::List(items) => {
            let position = index_of(&index, container)?;
            let mut items = items.borrow_mut();
            let slot = normalize(position, items.len())
                .ok_or_else(|| RuntimeError::index_error("list assignment index out of range"))?;
            items[slot] = value;
            Ok(())
        }
        Value::Dict(dict) => dict.borrow_mut().insert(index, value),
        other => Err(RuntimeError::type_error(format!(
            "'{}' object does not support item assignment",
            other.type_name()
        ))),
    }
}

/// Positions selected by `[lower:upper:step]` on a sequence of `len`.
fn slice_positions(
    len: usize,
    lower: &Value,
    upper: &Value,
    step: &Value,
) -> Result<Vec<usize>, RuntimeError> {
    let bound = |value: &Value| -> Result<Option<i64>, RuntimeError> {
        match value {
            Value::None => Ok(None),
            other => other.as_int().map(Some).ok_or_else(|| {
                RuntimeError::type_error(
                    "slice indices must be integers or None or have an __index__ method",
                )
            }),
        }
    };
    let step = bound(step)?.unwrap_or(1);
    if step == 0 {
        return Err(RuntimeError::value_error("slice step cannot be zero"));
    }
    let len = i64::try_from(len).map_err(|_| RuntimeError::overflow())?;
    let clamp = |value: i64, low: i64, high: i64| {
        let value = if value < 0 { value.saturating_add(len) } else { value };
        value.clamp(low, high)
    };
    let (start, stop) = if step > 0 {
        (
            bound(lower)?.map_or(0, |v| clamp(v, 0, len)),
            bound(upper)?.map_or(len, |v| clamp(v, 0, len)),
        )
    } else {
        (
            bound(lower)?.map_or(len - 1, |v| clamp(v, -1, len - 1)),
            bound(upper)?.map_or(-1, |v| clamp(v, -1, len - 1)),
        )
    };
    let mut positions = Vec::new();
    let mut current = start;
    while (step > 0 && current < stop) || (step < 0 && current > stop) {
        positions.extend(usize::try_from(current).ok());
        match current.checked_add(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(positions)
}

/// `container[lower:upper:step]`.
pub fn get_slice(
    container: &Value,
    lower: &Value,
    upper: &Value,
    step: &Value,
) -> Result<Value, RuntimeError> {
    match container {
        Value::List(items) => {
            let items = items.borrow();
            let positions = slice_positions(items.len(), lower, upper, step)?;
            Ok(Value::list(positions.into_iter().map(|i| items[i].clone()).collect()))
        }
        Value::Tuple(items) => {
            let positions = slice_positions(items.len(), lower, upper, step)?;
            Ok(Value::tuple(positions.into_iter().map(|i| items[i].clone()).collect()))
        }
        Value::Str(text) => {
            let chars: Vec<char> = text.chars().collect();
            let positions = slice_positions(chars.len(), lower, upper, step)?;
            Ok(Value::str(positions.into_iter().map(|i| chars[i]).collect::<String>()))
        }
        Value::Range(range) => {
            let positions = slice_positions(range.len(), lower, upper, step)?;
            let step = step.as_int().unwrap_or(1).saturating_mul(range.step);
            let start = positions
                .first()
                .and_then(|i| range.get(*i))
                .unwrap_or(range.start);
            let stop = start.saturating_add(step.saturating_mul(positions.len() as i64));
            Ok(Value::Range(RangeValue { start, stop, step }))
        }
        other => Err(RuntimeError::type_error(format!(
            "'{}' object is not subscriptable",
            other.type_name()
        ))),
    }
}

/// Start iterating over `value`.
pub fn iterate(value: &Value) -> Result<IterRef, RuntimeError> {
    let state = match value {
        Value::List(list) => IterState::List {
            list: list.clone(),
            index: 0,
        },
        Value::Tuple(items) => IterState::items(items.to_vec()),
        Value::Str(text) => {
            IterState::items(text.chars().map(|ch| Value::str(ch.to_string())).collect())
        }
        Value::Dict(dict) => IterState::items(dict.borrow().keys().cloned().collect()),
        Value::Range(range) => IterState::Range {
            next: range.start,
            stop: range.stop,
            step: range.step,
        },
        Value::Iterator(state) => return Ok(Rc::clone(state)),
        other => {
            return Err(RuntimeError::type_error(format!(
                "'{}' object is not iterable",
                other.type_name()
            )))
        }
    };
    Ok(Rc::new(std::cell::RefCell::new(state)))
}

/// Drain an iterable into a vector.
pub fn collect(value: &Value) -> Result<Vec<Value>, RuntimeError> {
    if let Value::List(items) = value {
        return Ok(items.borrow().clone());
    }
    let iterator = iterate(value)?;
    let mut items = Vec::new();
    loop {
        let next = iterator.borrow_mut().next_value();
        match next {
            Some(item) => items.push(item),
            None => return Ok(items),
        }
    }
}

/// Destructure `value` into exactly `count` items.
pub fn unpack(value: &Value, count: usize) -> Result<Vec<Value>, RuntimeError> {
    let items = collect(value).map_err(|_| {
        RuntimeError::type_error(format!(
            "cannot unpack non-iterable {} object",
            value.type_name()
        ))
    })?;
    match items.len().cmp(&count) {
        Ordering::Equal => Ok(items),
        Ordering::Greater => Err(RuntimeError::value_error(format!(
            "too many values to unpack (expected {count})"
        ))),
        Ordering::Less => Err(RuntimeError::value_error(format!(
            "not enough values to unpack (expected {count}, got {})",
            items.len()
        ))),
    }
}

/// printf-style `template % args` supporting `%s %r %d %i %f %x %%` with
/// optional `-`/`0` flags, width and precision.
fn format_percent(template: &str, args: &Value) -> Result<Value, RuntimeError> {
    let args: Vec<Value> = match args {
        Value::Tuple(items) => items.to_vec(),
        other => vec![other.clone()],
    };
    let mut args = args.into_iter();
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        let mut left_align = false;
        let mut zero_pad = false;
        while let Some(flag) = chars.next_if(|c| *c == '-' || *c == '0') {
            if flag == '-' {
                left_align = true;
            } else {
                zero_pad = true;
            }
        }
        let mut width = 0usize;
        while let Some(digit) = chars.next_if(char::is_ascii_digit) {
            width = width * 10 + digit.to_digit(10).map_or(0, |d| d as usize);
        }
        let mut precision = None;
        if chars.next_if_eq(&'.').is_some() {
            let mut value = 0usize;
            while let Some(digit) = chars.next_if(char::is_ascii_digit) {
                value = value * 10 + digit.to_digit(10).map_or(0, |d| d as usize);
            }
            precision = Some(value);
        }
        let Some(conversion) = chars.next() else {
            return Err(RuntimeError::value_error("incomplete format"));
        };
        if conversion == '%' {
            out.push('%');
            continue;
        }
        let arg = args
            .next()
            .ok_or_else(|| RuntimeError::type_error("not enough arguments for format string"))?;
        let text = match conversion {
            's' => arg.to_str(),
            'r' => arg.repr(),
            'd' | 'i' => match Num::of(&arg) {
                Some(Num::Int(value)) => value.to_string(),
                Some(Num::Float(value)) => format!("{}", value.trunc() as i64),
                None => {
                    return Err(RuntimeError::type_error(format!(
                        "%{conversion} format: a real number is required, not {}",
                        arg.type_name()
                    )))
                }
            },
            'f' => match Num::of(&arg) {
                Some(num) => format!("{:.*}", precision.unwrap_or(6), num.as_f64()),
                None => {
                    return Err(RuntimeError::type_error(format!(
                        "must be real number, not {}",
                        arg.type_name()
                    )))
                }
            },
            'g' => match Num::of(&arg) {
                Some(num) => format_float(num.as_f64()),
                None => {
                    return Err(RuntimeError::type_error(format!(
                        "must be real number, not {}",
                        arg.type_name()
                    )))
                }
            },
            'x' => match arg.as_int() {
                Some(value) if value < 0 => format!("-{:x}", value.unsigned_abs()),
                Some(value) => format!("{value:x}"),
                None => {
                    return Err(RuntimeError::type_error(format!(
                        "%x format: an integer is required, not {}",
                        arg.type_name()
                    )))
                }
            },
            other => {
                return Err(RuntimeError::value_error(format!(
                    "unsupported format character '{other}'"
                )))
            }
        };
        let text = match (conversion, precision) {
            ('s' | 'r', Some(limit)) => text.chars().take(limit).collect(),
            _ => text,
        };
        let pad = width.saturating_sub(text.chars().count());
        if left_align {
            out.push_str(&text);
            out.extend(std::iter::repeat(' ').take(pad));
        } else if zero_pad && conversion != 's' && conversion != 'r' {
            let (sign, digits) = match text.strip_prefix('-') {
                Some(digits) => ("-", digits),
                None => ("", text.as_str()),
            };
            out.push_str(sign);
            out.extend(std::iter::repeat('0').take(pad));
            out.push_str(digits);
        } else {
            out.extend(std::iter::repeat(' ').take(pad));
            out.push_str(&text);
        }
    }
    if args.next().is_some() {
        return Err(RuntimeError::type_error(
            "not all arguments converted during string formatting",
        ));
    }
    Ok(Value::str(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i64) -> Value {
        Value::Int(value)
    }

    #[test]
    fn floor_division_and_modulo_follow_python_signs() {
        assert_eq!(binary_op(BinaryOp::FloorDiv, &int(-7), &int(2)).unwrap().repr(), "-4");
        assert_eq!(binary_op(BinaryOp::Mod, &int(-7), &int(2)).unwrap().repr(), "1");
        assert_eq!(binary_op(BinaryOp::Mod, &int(7), &int(-2)).unwrap().repr(), "-1");
        assert_eq!(
            binary_op(BinaryOp::Mod, &Value::Float(-1.0), &Value::Float(3.0))
                .unwrap()
                .repr(),
            "2.0"
        );
    }

    #[test]
    fn true_division_always_yields_float() {
        assert_eq!(binary_op(BinaryOp::Div, &int(6), &int(3)).unwrap().repr(), "2.0");
    }

    #[test]
    fn division_by_zero_messages() {
        let err = binary_op(BinaryOp::Div, &int(1), &int(0)).unwrap_err();
        assert_eq!(err.describe(), "ZeroDivisionError: division by zero");
        let err = binary_op(BinaryOp::Mod, &int(1), &int(0)).unwrap_err();
        assert_eq!(err.to_string(), "integer division or modulo by zero");
        let err = binary_op(BinaryOp::Div, &Value::Float(1.0), &int(0)).unwrap_err();
        assert_eq!(err.to_string(), "float division by zero");
    }

    #[test]
    fn integer_overflow_is_reported() {
        let err = binary_op(BinaryOp::Mul, &int(i64::MAX), &int(2)).unwrap_err();
        assert_eq!(err.class_name(), "OverflowError");
        assert_eq!(binary_op(BinaryOp::Pow, &int(2), &int(10)).unwrap().repr(), "1024");
        assert_eq!(binary_op(BinaryOp::Pow, &int(2), &int(-1)).unwrap().repr(), "0.5");
    }

    #[test]
    fn sequence_operators() {
        let list = Value::list(vec![int(1)]);
        assert_eq!(binary_op(BinaryOp::Mul, &list, &int(3)).unwrap().repr(), "[1, 1, 1]");
        assert_eq!(
            binary_op(BinaryOp::Mul, &int(2), &Value::str("ab")).unwrap().repr(),
            "'abab'"
        );
        let err = binary_op(BinaryOp::Add, &Value::str("a"), &int(1)).unwrap_err();
        assert_eq!(err.to_string(), "can only concatenate str (not \"int\") to str");
        let err = binary_op(BinaryOp::Sub, &Value::str("a"), &int(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported operand type(s) for -: 'str' and 'int'"
        );
    }

    #[test]
    fn inplace_add_mutates_lists() {
        let list = Value::list(vec![int(1)]);
        let alias = list.clone();
        inplace_op(BinaryOp::Add, &list, &Value::tuple(vec![int(2)])).unwrap();
        assert_eq!(alias.repr(), "[1, 2]");
    }

    #[test]
    fn comparisons() {
        assert!(compare(CompareOp::Eq, &int(1), &Value::Float(1.0)).unwrap());
        assert!(compare(CompareOp::Eq, &Value::Bool(true), &int(1)).unwrap());
        assert!(compare(CompareOp::Lt, &Value::str("apple"), &Value::str("banana")).unwrap());
        let a = Value::list(vec![int(1), int(2)]);
        let b = Value::list(vec![int(1), int(3)]);
        assert!(compare(CompareOp::Lt, &a, &b).unwrap());
        assert!(compare(CompareOp::GtEq, &b, &a).unwrap());
        assert!(!compare(CompareOp::Lt, &Value::Float(f64::NAN), &int(1)).unwrap());
        let err = compare(CompareOp::Lt, &int(1), &Value::str("x")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "'<' not supported between instances of 'int' and 'str'"
        );
    }

    #[test]
    fn identity_versus_equality() {
        let a = Value::list(Vec::new());
        let b = Value::list(Vec::new());
        assert!(equals(&a, &b).unwrap());
        assert!(!identical(&a, &b));
        assert!(identical(&a, &a.clone()));
    }

    #[test]
    fn membership() {
        let list = Value::list(vec![int(1), Value::str("x")]);
        assert!(contains(&list, &Value::str("x")).unwrap());
        assert!(contains(&Value::str("hello"), &Value::str("ell")).unwrap());
        let err = contains(&int(3), &int(1)).unwrap_err();
        assert_eq!(err.to_string(), "argument of type 'int' is not iterable");
    }

    #[test]
    fn indexing() {
        let list = Value::list(vec![int(10), int(20), int(30)]);
        assert_eq!(get_item(&list, &int(-1)).unwrap().repr(), "30");
        let err = get_item(&list, &int(3)).unwrap_err();
        assert_eq!(err.describe(), "IndexError: list index out of range");
        let err = get_item(&list, &Value::str("a")).unwrap_err();
        assert_eq!(err.to_string(), "list indices must be integers or slices, not str");
        let err = get_item(&int(1), &int(0)).unwrap_err();
        assert_eq!(err.to_string(), "'int' object is not subscriptable");
    }

    #[test]
    fn missing_dict_key_reports_repr() {
        let dict = Value::dict(crate::value::Dict::new());
        let err = get_item(&dict, &Value::str("k")).unwrap_err();
        assert_eq!(err.describe(), "KeyError: 'k'");
    }

    #[test]
    fn slicing() {
        let list = Value::list((0..6).map(int).collect());
        let none = Value::None;
        assert_eq!(get_slice(&list, &int(1), &int(4), &none).unwrap().repr(), "[1, 2, 3]");
        assert_eq!(get_slice(&list, &none, &none, &int(-2)).unwrap().repr(), "[5, 3, 1]");
        assert_eq!(get_slice(&list, &int(-2), &none, &none).unwrap().repr(), "[4, 5]");
        assert_eq!(
            get_slice(&Value::str("hello"), &none, &none, &int(-1)).unwrap().repr(),
            "'olleh'"
        );
        let err = get_slice(&list, &none, &none, &int(0)).unwrap_err();
        assert_eq!(err.to_string(), "slice step cannot be zero");
    }

    #[test]
    fn unpacking() {
        let pair = Value::tuple(vec![int(1), int(2)]);
        assert_eq!(unpack(&pair, 2).unwrap().len(), 2);
        let err = unpack(&pair, 3).unwrap_err();
        assert_eq!(err.to_string(), "not enough values to unpack (expected 3, got 2)");
        let err = unpack(&int(1), 2).unwrap_err();
        assert_eq!(err.to_string(), "cannot unpack non-iterable int object");
    }

    #[test]
    fn percent_formatting() {
        let args = Value::tuple(vec![Value::str("x"), int(5), Value::Float(2.5)]);
        assert_eq!(
            binary_op(BinaryOp::Mod, &Value::str("%s=%03d (%.1f%%)"), &args)
                .unwrap()
                .to_str(),
            "x=005 (2.5%)"
        );
        let err = binary_op(BinaryOp::Mod, &Value::str("%s %s"), &int(1)).unwrap_err();
        assert_eq!(err.to_string(), "not enough arguments for format string");
    }
}
