//! `str()` and `repr()` rendering.
//!
//! Containers already being printed render as `[...]` / `{...}`, so
//! self-referential lists and dicts print the way Python prints them.

use std::fmt::Write as _;

use super::{IterState, Value};

/// Nesting beyond this depth is elided like a cycle.
const MAX_DEPTH: usize = 100;

impl Value {
    /// Python `repr(value)`.
    #[must_use]
    pub fn repr(&self) -> String {
        let mut printer = Printer::default();
        printer.repr(self);
        printer.out
    }

    /// Python `str(value)`.
    #[must_use]
    pub fn to_str(&self) -> String {
        match self {
            Value::Str(text) => text.to_string(),
            Value::Exception(exception) => exception.message.to_string(),
            other => other.repr(),
        }
    }
}

#[derive(Default)]
struct Printer {
    out: String,
    /// Addresses of the containers currently being printed.
    active: Vec<usize>,
}

impl Printer {
    fn repr(&mut self, value: &Value) {
        match value {
            Value::None => self.out.push_str("None"),
            Value::Bool(true) => self.out.push_str("True"),
            Value::Bool(false) => self.out.push_str("False"),
            Value::Int(value) => {
                let _ = write!(self.out, "{value}");
            }
            Value::Float(value) => self.out.push_str(&format_float(*value)),
            Value::Str(text) => self.out.push_str(&quote_str(text)),
            Value::List(items) => {
                let address = items.address();
                if !self.enter(address) {
                    self.out.push_str("[...]");
                    return;
                }
                self.out.push('[');
                self.sequence(&items.borrow());
                self.out.push(']');
                self.active.pop();
            }
            Value::Tuple(items) => {
                let address = items.address();
                if !self.enter(address) {
                    self.out.push_str("(...)");
                    return;
                }
                self.out.push('(');
                self.sequence(items);
                if items.len() == 1 {
                    self.out.push(',');
                }
                self.out.push(')');
                self.active.pop();
            }
            Value::Dict(dict) => {
                let address = dict.address();
                if !self.enter(address) {
                    self.out.push_str("{...}");
                    return;
                }
                self.out.push('{');
                for (i, (key, value)) in dict.borrow().items().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.repr(key);
                    self.out.push_str(": ");
                    self.repr(value);
                }
                self.out.push('}');
                self.active.pop();
            }
            Value::Range(range) => {
                let _ = if range.step == 1 {
                    write!(self.out, "range({}, {})", range.start, range.stop)
                } else {
                    write!(
                        self.out,
                        "range({}, {}, {})",
                        range.start, range.stop, range.step
                    )
                };
            }
            Value::Iterator(state) => {
                let name = state.borrow().type_name();
                let _ = write!(self.out, "<{name} object>");
            }
            Value::Function(function) => {
                let _ = write!(self.out, "<function {}>", function.name());
            }
            Value::Builtin(builtin) if builtin.is_class() => {
                let _ = write!(self.out, "<class '{}'>", builtin.name());
            }
            Value::Builtin(builtin) => {
                let _ = write!(self.out, "<built-in function {}>", builtin.name());
            }
            Value::BoundMethod(method) => {
                let _ = write!(
                    self.out,
                    "<built-in method {} of {} object>",
                    method.name,
                    method.receiver.type_name()
                );
            }
            Value::Exception(exception) if exception.message.is_empty() => {
                let _ = write!(self.out, "{}()", exception.class);
            }
            Value::Exception(exception) => {
                let _ = write!(
                    self.out,
                    "{}({})",
                    exception.class,
                    quote_str(&exception.message)
                );
            }
        }
    }

    fn sequence(&mut self, items: &[Value]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.repr(item);
        }
    }

    fn enter(&mut self, address: usize) -> bool {
        if self.active.len() >= MAX_DEPTH || self.active.contains(&address) {
            return false;
        }
        self.active.push(address);
        true
    }
}

/// Python float repr: shortest round-trip digits, `.0` for integral values,
/// exponent form outside `[1e-4, 1e16)`.
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let text = format!("{value:e}");
        let (mantissa, exponent) = text.split_once('e').unwrap_or((&text, "0"));
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        return format!("{mantissa}e{sign}{digits:0>2}");
    }
    let text = format!("{value}");
    if text.contains('.') {
        text
    } else {
        format!("{text}.0")
    }
}

/// Python string repr: single quotes unless the text contains a single
/// quote and no double quote.
#[must_use]
pub fn quote_str(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch == quote => {
                out.push('\\');
                out.push(ch);
            }
            ch if ch.is_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(ch));
            }
            ch => out.push(ch),
        }
    }
    out.push(quote);
    out
}

impl IterState {
    /// Python type name of the iterator object.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            IterState::List { .. } => "list_iterator",
            IterState::Items { .. } => "iterator",
            IterState::Range { .. } => "range_iterator",
            IterState::Enumerate { .. } => "enumerate",
            IterState::Zip(_) => "zip",
        }
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;
    use crate::value::{Dict, RangeValue};

    #[test]
    fn floats() {
        assert_eq!(format_float(3.0), "3.0");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(-0.0), "-0.0");
        assert_eq!(format_float(2.5e-5), "2.5e-05");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e300), "1.5e+300");
        assert_eq!(format_float(f64::INFINITY), "inf");
    }

    #[test]
    fn strings() {
        assert_eq!(quote_str("abc"), "'abc'");
        assert_eq!(quote_str("it's"), "\"it's\"");
        assert_eq!(quote_str("a'b\"c"), "'a\\'b\"c'");
        assert_eq!(quote_str("x\ny"), "'x\\ny'");
        assert_eq!(quote_str("\u{1}"), "'\\x01'");
    }

    #[test]
    fn containers() {
        let mut dict = Dict::new();
        dict.insert(Value::str("k"), Value::tuple(vec![Value::Int(1)]))
            .unwrap();
        dict.insert(Value::Int(2), Value::list(vec![Value::None, Value::Float(1.0)]))
            .unwrap();
        expect![[r#"{'k': (1,), 2: [None, 1.0]}"#]].assert_eq(&Value::dict(dict).repr());

        let range = Value::Range(RangeValue {
            start: 0,
            stop: 10,
            step: 2,
        });
        assert_eq!(range.repr(), "range(0, 10, 2)");
        assert_eq!(Value::tuple(Vec::new()).repr(), "()");
    }

    #[test]
    fn self_referential_list() {
        let list = Value::list(vec![Value::Int(1)]);
        if let Value::List(items) = &list {
            items.borrow_mut().push(list.clone());
        }
        assert_eq!(list.repr(), "[1, [...]]");
        assert_eq!(list.to_str(), "[1, [...]]");
    }

    #[test]
    fn shared_but_acyclic_lists_print_fully() {
        let inner = Value::list(vec![Value::Int(0)]);
        let outer = Value::list(vec![inner.clone(), inner]);
        assert_eq!(outer.repr(), "[[0], [0]]");
    }

    #[test]
    fn str_of_string_is_unquoted() {
        assert_eq!(Value::str("hi").to_str(), "hi");
        assert_eq!(Value::list(vec![Value::str("hi")]).to_str(), "['hi']");
    }
}
