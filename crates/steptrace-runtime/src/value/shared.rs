//! Shared container handles.
//!
//! Dropping the last handle to a nested container would otherwise recurse
//! once per nesting level, so a program building `a = [a]` in a loop could
//! overflow the native stack on teardown. When a handle is the last owner it
//! moves its children onto a heap worklist first, which keeps drop depth
//! constant.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use super::{Dict, Value};

/// Handle to a mutable, shared list.
#[derive(Clone)]
pub struct ListRef(Rc<RefCell<Vec<Value>>>);

/// Handle to a mutable, shared dict.
#[derive(Clone)]
pub struct DictRef(Rc<RefCell<Dict>>);

/// Handle to an immutable tuple.
#[derive(Clone)]
pub struct TupleRef(Rc<[Value]>);

impl ListRef {
    #[must_use]
    pub fn new(items: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }

    /// Identity of the underlying list.
    #[must_use]
    pub fn address(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl DictRef {
    #[must_use]
    pub fn new(dict: Dict) -> Self {
        Self(Rc::new(RefCell::new(dict)))
    }

    /// Identity of the underlying dict.
    #[must_use]
    pub fn address(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl TupleRef {
    /// Identity of the underlying tuple.
    #[must_use]
    pub fn address(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<Value>() as usize
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Vec<Value>> for TupleRef {
    fn from(items: Vec<Value>) -> Self {
        Self(items.into())
    }
}

impl Deref for ListRef {
    type Target = RefCell<Vec<Value>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Deref for DictRef {
    type Target = RefCell<Dict>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Deref for TupleRef {
    type Target = [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for ListRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(items) => f.debug_list().entries(items.iter()).finish(),
            Err(_) => f.write_str("[<borrowed>]"),
        }
    }
}

impl fmt::Debug for DictRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(dict) => f.debug_map().entries(dict.items()).finish(),
            Err(_) => f.write_str("{<borrowed>}"),
        }
    }
}

impl fmt::Debug for TupleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl Drop for ListRef {
    fn drop(&mut self) {
        if let Some(cell) = Rc::get_mut(&mut self.0) {
            release(std::mem::take(cell.get_mut()));
        }
    }
}

impl Drop for DictRef {
    fn drop(&mut self) {
        if let Some(cell) = Rc::get_mut(&mut self.0) {
            let mut pending = Vec::new();
            cell.get_mut().drain_into(&mut pending);
            release(pending);
        }
    }
}

impl Drop for TupleRef {
    fn drop(&mut self) {
        if let Some(items) = Rc::get_mut(&mut self.0) {
            release(take_slots(items));
        }
    }
}

fn take_slots(items: &mut [Value]) -> Vec<Value> {
    items
        .iter_mut()
        .map(|slot| std::mem::replace(slot, Value::None))
        .collect()
}

/// Drop `pending` without recursing into uniquely owned containers: their
/// children are detached onto the worklist before the emptied shell drops.
fn release(mut pending: Vec<Value>) {
    while let Some(mut value) = pending.pop() {
        match &mut value {
            Value::List(list) => {
                if let Some(cell) = Rc::get_mut(&mut list.0) {
                    pending.append(cell.get_mut());
                }
            }
            Value::Dict(dict) => {
                if let Some(cell) = Rc::get_mut(&mut dict.0) {
                    cell.get_mut().drain_into(&mut pending);
                }
            }
            Value::Tuple(items) => {
                if let Some(items) = Rc::get_mut(&mut items.0) {
                    pending.extend(take_slots(items));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_list_chain_drops() {
        let mut value = Value::list(Vec::new());
        for _ in 0..200_000 {
            value = Value::list(vec![value]);
        }
        drop(value);
    }

    #[test]
    fn deep_mixed_chain_drops() {
        let mut value = Value::None;
        for i in 0..200_000 {
            value = match i % 3 {
                0 => Value::tuple(vec![value]),
                1 => {
                    let mut dict = Dict::new();
                    dict.insert_str("next", value);
                    Value::dict(dict)
                }
                _ => Value::list(vec![Value::Int(i), value]),
            };
        }
        drop(value);
    }

    #[test]
    fn shared_children_survive_parent_drop() {
        let child = Value::list(vec![Value::Int(1)]);
        let parent = Value::list(vec![child.clone(), child.clone()]);
        drop(parent);
        assert_eq!(child.repr(), "[1]");
    }
}
