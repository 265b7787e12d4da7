//! Runtime values.
//!
//! Lists and dicts are shared and mutable ([`ListRef`], [`DictRef`]), so aliasing
//! behaves as in Python: appending through one name is visible through every
//! other. Tuples and strings are immutable and shared freely.

#![allow(missing_docs)]

mod dict;
mod display;
mod iter;
mod shared;

pub use dict::{Dict, DictKey};
pub use display::{format_float, quote_str};
pub use iter::IterState;
pub use shared::{DictRef, ListRef, TupleRef};

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;
use steptrace_syntax::ast::FunctionDef;

use crate::eval::builtins::Builtin;
use crate::memory::SourceId;

pub type IterRef = Rc<RefCell<IterState>>;

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(SmolStr),
    List(ListRef),
    Tuple(TupleRef),
    Dict(DictRef),
    Range(RangeValue),
    Iterator(IterRef),
    Function(Rc<Function>),
    Builtin(Builtin),
    BoundMethod(Rc<BoundMethod>),
    Exception(Rc<ExceptionValue>),
}

/// `range(start, stop, step)`; `step` is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeValue {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl RangeValue {
    #[must_use]
    pub fn len(&self) -> usize {
        let (lo, hi, step) = if self.step > 0 {
            (i128::from(self.start), i128::from(self.stop), i128::from(self.step))
        } else {
            (i128::from(self.stop), i128::from(self.start), -i128::from(self.step))
        };
        if lo >= hi {
            return 0;
        }
        usize::try_from((hi - lo - 1) / step + 1).unwrap_or(usize::MAX)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at a non-negative position, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<i64> {
        if index >= self.len() {
            return None;
        }
        let offset = i64::try_from(index).ok()?.checked_mul(self.step)?;
        self.start.checked_add(offset)
    }

    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        let in_bounds = if self.step > 0 {
            self.start <= value && value < self.stop
        } else {
            self.stop < value && value <= self.start
        };
        in_bounds && (i128::from(value) - i128::from(self.start)) % i128::from(self.step) == 0
    }
}

/// User-defined function closed over its defaults and defining source.
#[derive(Debug)]
pub struct Function {
    pub def: Rc<FunctionDef>,
    pub defaults: Vec<Value>,
    pub source: SourceId,
}

impl Function {
    #[must_use]
    pub fn name(&self) -> &SmolStr {
        &self.def.name
    }
}

/// Method looked up on a receiver, e.g. `xs.append`.
#[derive(Debug)]
pub struct BoundMethod {
    pub receiver: Value,
    pub name: SmolStr,
}

/// Exception instance created by calling an exception class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionValue {
    pub class: SmolStr,
    pub message: SmolStr,
}

impl Value {
    #[must_use]
    pub fn str(text: impl Into<SmolStr>) -> Self {
        Value::Str(text.into())
    }

    #[must_use]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(ListRef::new(items))
    }

    #[must_use]
    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(items.into())
    }

    #[must_use]
    pub fn dict(dict: Dict) -> Self {
        Value::Dict(DictRef::new(dict))
    }

    #[must_use]
    pub fn iterator(state: IterState) -> Self {
        Value::Iterator(Rc::new(RefCell::new(state)))
    }

    /// Python `type(value).__name__`.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Range(_) => "range",
            Value::Iterator(state) => state.borrow().type_name(),
            Value::Function(_) => "function",
            Value::Builtin(builtin) if builtin.is_class() => "type",
            Value::Builtin(_) | Value::BoundMethod(_) => "builtin_function_or_method",
            Value::Exception(exception) => exception.class.as_str(),
        }
    }

    /// Python truthiness.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(value) => *value,
            Value::Int(value) => *value != 0,
            Value::Float(value) => *value != 0.0,
            Value::Str(value) => !value.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Tuple(items) => !items.is_empty(),
            Value::Dict(dict) => !dict.borrow().is_empty(),
            Value::Range(range) => !range.is_empty(),
            _ => true,
        }
    }

    /// Integer view of `int` and `bool` values.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            Value::Bool(value) => Some(i64::from(*value)),
            _ => None,
        }
    }

    /// Convert a JSON document into a runtime value (arrays become lists,
    /// objects become dicts with string keys).
    #[must_use]
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(value) => Value::Bool(*value),
            serde_json::Value::Number(number) => number
                .as_i64()
                .map(Value::Int)
                .or_else(|| number.as_f64().map(Value::Float))
                .unwrap_or(Value::None),
            serde_json::Value::String(text) => Value::str(text.as_str()),
            serde_json::Value::Array(items) => {
                Value::list(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(entries) => {
                let mut dict = Dict::new();
                for (key, value) in entries {
                    dict.insert_str(key.as_str(), Value::from_json(value));
                }
                Value::dict(dict)
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_len_and_membership() {
        let range = RangeValue {
            start: 0,
            stop: 10,
            step: 3,
        };
        assert_eq!(range.len(), 4);
        assert_eq!(range.get(3), Some(9));
        assert!(range.contains(6));
        assert!(!range.contains(7));

        let down = RangeValue {
            start: 5,
            stop: 0,
            step: -2,
        };
        assert_eq!(down.len(), 3);
        assert!(down.contains(1));
        assert!(!down.contains(0));
        assert!(RangeValue {
            start: 3,
            stop: 3,
            step: 1
        }
        .is_empty());
    }

    #[test]
    fn json_arguments() {
        let json: serde_json::Value = serde_json::from_str(r#"[[2, 7, 11, 15], 9, {"a": null}]"#)
            .expect("valid json");
        let value = Value::from_json(&json);
        assert_eq!(value.repr(), "[[2, 7, 11, 15], 9, {'a': None}]");
    }

    #[test]
    fn truthiness() {
        assert!(!Value::None.is_truthy());
        assert!(!Value::list(Vec::new()).is_truthy());
        assert!(Value::str("x").is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(Value::tuple(vec![Value::None]).is_truthy());
    }
}
