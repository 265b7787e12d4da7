//! Tracer errors.

#![allow(missing_docs)]

use smol_str::SmolStr;
use thiserror::Error;

use crate::driver::DriverState;

/// Failures that abort a trace run or an emission step.
///
/// Faults raised by the traced code are not errors here: they become the
/// synthetic final step of the trace.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("invalid trace config: {0}")]
    Config(SmolStr),

    /// The traced source identity is already claimed by a loaded module.
    #[error("cannot install trace hook: source '{0}' is already loaded")]
    HookInstall(SmolStr),

    /// The host prelude failed to load.
    #[error("host prelude failed: {0}")]
    Prelude(String),

    /// `run` was called on a driver that already finished a run.
    #[error("driver is {0}, expected idle")]
    NotIdle(DriverState),

    #[error("malformed trace payload: {0}")]
    Payload(SmolStr),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
