//! Trace configuration.

#![allow(missing_docs)]

use std::path::Path;

use serde::Deserialize;
use smol_str::SmolStr;
use steptrace_runtime::eval::DEFAULT_MAX_CALL_DEPTH;

use crate::error::TraceError;

/// Source identity of the traced unit.
pub const DEFAULT_SOURCE_NAME: &str = "<string>";
/// Source identity of the host prelude.
pub const PRELUDE_SOURCE_NAME: &str = "<prelude>";
pub const DEFAULT_MAX_CALL_STACK: usize = 10;
pub const DEFAULT_INTERNAL_PREFIX: &str = "__";
/// Largest accepted `max_call_depth`; the tracing thread's stack is sized
/// from it.
pub const MAX_CALL_DEPTH_LIMIT: usize = 2_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceConfig {
    /// Only line events from frames of this source are recorded.
    pub source_name: SmolStr,
    /// Cap on recorded call-stack identifiers.
    pub max_call_stack: usize,
    /// Variables starting with this prefix are never snapshotted.
    pub internal_prefix: SmolStr,
    /// Extra variable names hidden from every snapshot.
    pub excluded_names: Vec<SmolStr>,
    /// Nested call limit before the traced code faults with `RecursionError`.
    pub max_call_depth: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            source_name: SmolStr::new_static(DEFAULT_SOURCE_NAME),
            max_call_stack: DEFAULT_MAX_CALL_STACK,
            internal_prefix: SmolStr::new_static(DEFAULT_INTERNAL_PREFIX),
            excluded_names: Vec::new(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl TraceConfig {
    /// Load a `[trace]` table from a TOML file. Missing keys keep their
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| {
            TraceError::Config(format!("{}: {err}", path.display()).into())
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, TraceError> {
        let raw: ConfigToml = toml::from_str(text)
            .map_err(|err| TraceError::Config(format!("trace config: {err}").into()))?;
        raw.into_config()
    }

    /// Reject settings a run cannot honor.
    pub fn validate(&self) -> Result<(), TraceError> {
        if self.source_name.trim().is_empty() {
            return Err(TraceError::Config("trace.source_name must not be empty".into()));
        }
        if self.source_name == PRELUDE_SOURCE_NAME {
            return Err(TraceError::Config(
                format!("trace.source_name '{PRELUDE_SOURCE_NAME}' is reserved for the host prelude")
                    .into(),
            ));
        }
        if self.max_call_stack == 0 {
            return Err(TraceError::Config("trace.max_call_stack must be at least 1".into()));
        }
        if !(1..=MAX_CALL_DEPTH_LIMIT).contains(&self.max_call_depth) {
            return Err(TraceError::Config(
                format!("trace.max_call_depth must be between 1 and {MAX_CALL_DEPTH_LIMIT}").into(),
            ));
        }
        if self.internal_prefix.is_empty() {
            return Err(TraceError::Config("trace.internal_prefix must not be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigToml {
    trace: Option<TraceSection>,
}

#[derive(Debug, Default, Deserialize)]
struct TraceSection {
    source_name: Option<String>,
    max_call_stack: Option<usize>,
    internal_prefix: Option<String>,
    excluded_names: Option<Vec<String>>,
    max_call_depth: Option<usize>,
}

impl ConfigToml {
    fn into_config(self) -> Result<TraceConfig, TraceError> {
        let section = self.trace.unwrap_or_default();
        let defaults = TraceConfig::default();
        let config = TraceConfig {
            source_name: section.source_name.map_or(defaults.source_name, SmolStr::new),
            max_call_stack: section.max_call_stack.unwrap_or(defaults.max_call_stack),
            internal_prefix: section
                .internal_prefix
                .map_or(defaults.internal_prefix, SmolStr::new),
            excluded_names: section
                .excluded_names
                .map(|names| names.into_iter().map(SmolStr::new).collect())
                .unwrap_or(defaults.excluded_names),
            max_call_depth: section.max_call_depth.unwrap_or(defaults.max_call_depth),
        };
        config.validate()?;
        Ok(config)
    }
}
