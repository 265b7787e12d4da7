//! Insertion-ordered dictionary keyed by hashable values.

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::Value;
use crate::error::RuntimeError;

/// Hashable projection of a value.
///
/// Numerically equal keys collapse like in Python: `1`, `1.0` and `True`
/// all address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DictKey {
    None,
    Int(i64),
    /// Bit pattern of a non-integral float.
    Float(u64),
    Str(SmolStr),
    Tuple(Vec<DictKey>),
}

impl DictKey {
    /// Hash key for `value`, or `TypeError` for unhashable values.
    pub fn from_value(value: &Value) -> Result<Self, RuntimeError> {
        Ok(match value {
            Value::None => DictKey::None,
            Value::Bool(value) => DictKey::Int(i64::from(*value)),
            Value::Int(value) => DictKey::Int(*value),
            Value::Float(value) => float_key(*value),
            Value::Str(value) => DictKey::Str(value.clone()),
            Value::Tuple(items) => DictKey::Tuple(
                items
                    .iter()
                    .map(DictKey::from_value)
                    .collect::<Result<_, _>>()?,
            ),
            other => {
                return Err(RuntimeError::type_error(format!(
                    "unhashable type: '{}'",
                    other.type_name()
                )))
            }
        })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn float_key(value: f64) -> DictKey {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if value.fract() == 0.0 && (-LIMIT..LIMIT).contains(&value) {
        DictKey::Int(value as i64)
    } else {
        DictKey::Float(value.to_bits())
    }
}

/// Dictionary storage. Each entry keeps the key object it was first
/// inserted with, so `{1: 'a'}` stays `{1: 'a'}` after `d[True] = 'b'`.
#[derive(Debug, Clone, Default)]
pub struct Dict {
    entries: IndexMap<DictKey, (Value, Value)>,
}

impl Dict {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &Value) -> Result<Option<Value>, RuntimeError> {
        let hashed = DictKey::from_value(key)?;
        Ok(self.entries.get(&hashed).map(|(_, value)| value.clone()))
    }

    pub fn contains(&self, key: &Value) -> Result<bool, RuntimeError> {
        let hashed = DictKey::from_value(key)?;
        Ok(self.entries.contains_key(&hashed))
    }

    /// Insert or overwrite; an existing entry keeps its original key.
    pub fn insert(&mut self, key: Value, value: Value) -> Result<(), RuntimeError> {
        let hashed = DictKey::from_value(&key)?;
        match self.entries.get_mut(&hashed) {
            Some(entry) => entry.1 = value,
            None => {
                self.entries.insert(hashed, (key, value));
            }
        }
        Ok(())
    }

    pub(crate) fn insert_str(&mut self, key: &str, value: Value) {
        let key = SmolStr::new(key);
        self.entries
            .insert(DictKey::Str(key.clone()), (Value::Str(key), value));
    }

    /// Remove an entry, preserving the order of the rest.
    pub fn remove(&mut self, key: &Value) -> Result<Option<Value>, RuntimeError> {
        let hashed = DictKey::from_value(key)?;
        Ok(self.entries.shift_remove(&hashed).map(|(_, value)| value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.values().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values().map(|(_, value)| value)
    }

    pub fn items(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.values().map(|(key, value)| (key, value))
    }

    /// Move every key and value out into `out`, leaving the dict empty.
    pub(crate) fn drain_into(&mut self, out: &mut Vec<Value>) {
        for (_, (key, value)) in self.entries.drain(..) {
            out.push(key);
            out.push(value);
        }
    }
}
