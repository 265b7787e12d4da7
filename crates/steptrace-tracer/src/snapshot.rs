//! Owned copies of runtime values.
//!
//! A [`Snapshot`] never aliases interpreter state: lists, tuples and dicts
//! are copied element by element when the step is recorded, so later
//! mutation cannot rewrite an earlier step. Values that do not fit the JSON
//! data model degrade to their display string.

#![allow(missing_docs)]

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use steptrace_runtime::value::format_float;
use steptrace_runtime::Value;
use thiserror::Error;
use tracing::trace;

use crate::config::TraceConfig;

/// Containers nested deeper than this are not copied structurally.
const MAX_DEPTH: usize = 100;

/// Serializable copy of a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Snapshot>),
    Map(IndexMap<String, Snapshot>),
}

/// Why a value could not be copied structurally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("circular reference detected")]
    Cycle,
    #[error("out of range float value {0}")]
    NonFinite(String),
    #[error("keys must be str, int, float, bool or None, not {0}")]
    UnsupportedKey(SmolStr),
    #[error("nesting deeper than {MAX_DEPTH} levels")]
    TooDeep,
}

/// Copies variable bindings into snapshots, hiding machinery names.
#[derive(Debug, Clone)]
pub struct Snapshotter {
    internal_prefix: SmolStr,
    excluded: FxHashSet<SmolStr>,
}

impl Snapshotter {
    #[must_use]
    pub fn new(config: &TraceConfig) -> Self {
        Self {
            internal_prefix: config.internal_prefix.clone(),
            excluded: config.excluded_names.iter().cloned().collect(),
        }
    }

    /// Hide `name` from every later snapshot.
    pub fn exclude(&mut self, name: impl Into<SmolStr>) {
        self.excluded.insert(name.into());
    }

    #[must_use]
    pub fn is_hidden(&self, name: &str) -> bool {
        name.starts_with(self.internal_prefix.as_str()) || self.excluded.contains(name)
    }

    /// Snapshot every visible binding, in binding order.
    pub fn variables<'a, I>(&self, bindings: I) -> IndexMap<String, Snapshot>
    where
        I: IntoIterator<Item = (&'a SmolStr, &'a Value)>,
    {
        bindings
            .into_iter()
            .filter(|(name, _)| !self.is_hidden(name))
            .map(|(name, value)| (name.to_string(), self.snapshot(name, value)))
            .collect()
    }

    /// Copy `value`, falling back to its display string when it cannot be
    /// represented.
    #[must_use]
    pub fn snapshot(&self, name: &str, value: &Value) -> Snapshot {
        match try_snapshot(value) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                trace!(variable = name, error = %err, "snapshot fell back to display string");
                Snapshot::Str(value.to_str())
            }
        }
    }
}

/// Copy `value` structurally.
pub fn try_snapshot(value: &Value) -> Result<Snapshot, SnapshotError> {
    Copier::default().copy(value)
}

#[derive(Default)]
struct Copier {
    /// Addresses of the containers currently being copied.
    active: Vec<usize>,
}

impl Copier {
    fn copy(&mut self, value: &Value) -> Result<Snapshot, SnapshotError> {
        Ok(match value {
            Value::None => Snapshot::Null,
            Value::Bool(value) => Snapshot::Bool(*value),
            Value::Int(value) => Snapshot::Int(*value),
            Value::Float(value) if value.is_finite() => Snapshot::Float(*value),
            Value::Float(value) => return Err(SnapshotError::NonFinite(format_float(*value))),
            Value::Str(text) => Snapshot::Str(text.to_string()),
            Value::List(items) => {
                self.enter(items.address())?;
                let copied = self.sequence(&items.borrow());
                self.active.pop();
                Snapshot::List(copied?)
            }
            Value::Tuple(items) => {
                self.enter(items.address())?;
                let copied = self.sequence(items);
                self.active.pop();
                Snapshot::List(copied?)
            }
            Value::Dict(dict) => {
                self.enter(dict.address())?;
                let copied = dict
                    .borrow()
                    .items()
                    .map(|(key, value)| -> Result<_, SnapshotError> {
                        Ok((map_key(key)?, self.copy(value)?))
                    })
                    .collect::<Result<IndexMap<_, _>, _>>();
                self.active.pop();
                Snapshot::Map(copied?)
            }
            other => Snapshot::Str(other.to_str()),
        })
    }

    fn sequence(&mut self, items: &[Value]) -> Result<Vec<Snapshot>, SnapshotError> {
        items.iter().map(|item| self.copy(item)).collect()
    }

    fn enter(&mut self, address: usize) -> Result<(), SnapshotError> {
        if self.active.contains(&address) {
            return Err(SnapshotError::Cycle);
        }
        if self.active.len() >= MAX_DEPTH {
            return Err(SnapshotError::TooDeep);
        }
        self.active.push(address);
        Ok(())
    }
}

/// Map keys render the way a JSON encoder renders them.
fn map_key(key: &Value) -> Result<String, SnapshotError> {
    match key {
        Value::Str(text) => Ok(text.to_string()),
        Value::Int(value) => Ok(value.to_string()),
        Value::Bool(value) => Ok(value.to_string()),
        Value::None => Ok("null".to_string()),
        Value::Float(value) if value.is_finite() => Ok(format_float(*value)),
        Value::Float(value) => Err(SnapshotError::NonFinite(format_float(*value))),
        other => Err(SnapshotError::UnsupportedKey(other.type_name().into())),
    }
}
