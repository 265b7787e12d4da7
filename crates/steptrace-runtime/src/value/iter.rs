//! Iterator state shared by `for` loops and iterator builtins.

use super::{IterRef, ListRef, Value};

/// Position inside an iteration.
///
/// Lists are walked live by index (appending while iterating is observed,
/// as in Python); every other source is materialized up front.
#[derive(Debug)]
pub enum IterState {
    List { list: ListRef, index: usize },
    Items { items: Vec<Value>, index: usize },
    Range { next: i64, stop: i64, step: i64 },
    Enumerate { inner: IterRef, count: i64 },
    Zip(Vec<IterRef>),
}

impl IterState {
    #[must_use]
    pub fn items(items: Vec<Value>) -> Self {
        IterState::Items { items, index: 0 }
    }

    /// Advance and return the next element, or `None` when exhausted.
    pub fn next_value(&mut self) -> Option<Value> {
        match self {
            IterState::List { list, index } => {
                let item = list.borrow().get(*index).cloned()?;
                *index += 1;
                Some(item)
            }
            IterState::Items { items, index } => {
                let item = items.get(*index).cloned()?;
                *index += 1;
                Some(item)
            }
            IterState::Range { next, stop, step } => {
                let done = if *step > 0 {
                    *next >= *stop
                } else {
                    *next <= *stop
                };
                if done {
                    return None;
                }
                let current = *next;
                // Overflow past i64 means the range is exhausted.
                *next = next.checked_add(*step).unwrap_or(*stop);
                Some(Value::Int(current))
            }
            IterState::Enumerate { inner, count } => {
                let item = inner.borrow_mut().next_value()?;
                let index = *count;
                *count = count.saturating_add(1);
                Some(Value::tuple(vec![Value::Int(index), item]))
            }
            IterState::Zip(inners) => {
                if inners.is_empty() {
                    return None;
                }
                let mut row = Vec::with_capacity(inners.len());
                for inner in inners.iter() {
                    row.push(inner.borrow_mut().next_value()?);
                }
                Some(Value::tuple(row))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn drain(mut state: IterState) -> Vec<String> {
        std::iter::from_fn(|| state.next_value())
            .map(|value| value.repr())
            .collect()
    }

    #[test]
    fn ranges() {
        let up = IterState::Range {
            next: 0,
            stop: 3,
            step: 1,
        };
        assert_eq!(drain(up), vec!["0", "1", "2"]);
        let down = IterState::Range {
            next: 3,
            stop: 0,
            step: -2,
        };
        assert_eq!(drain(down), vec!["3", "1"]);
    }

    #[test]
    fn list_iteration_sees_appends() {
        let list = ListRef::new(vec![Value::Int(1)]);
        let mut state = IterState::List {
            list: list.clone(),
            index: 0,
        };
        assert_eq!(state.next_value().map(|v| v.repr()), Some("1".into()));
        list.borrow_mut().push(Value::Int(2));
        assert_eq!(state.next_value().map(|v| v.repr()), Some("2".into()));
        assert!(state.next_value().is_none());
    }

    #[test]
    fn enumerate_and_zip() {
        let inner = Rc::new(RefCell::new(IterState::items(vec![
            Value::str("a"),
            Value::str("b"),
        ])));
        let enumerate = IterState::Enumerate { inner, count: 0 };
        assert_eq!(drain(enumerate), vec!["(0, 'a')", "(1, 'b')"]);

        let left = Rc::new(RefCell::new(IterState::items(vec![Value::Int(1)])));
        let right = Rc::new(RefCell::new(IterState::items(vec![
            Value::Int(2),
            Value::Int(3),
        ])));
        assert_eq!(drain(IterState::Zip(vec![left, right])), vec!["(1, 2)"]);
    }
}
