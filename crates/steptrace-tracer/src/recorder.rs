//! Step records and the per-run recorder.

#![allow(missing_docs)]

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::snapshot::Snapshot;

/// Line number of the synthetic step appended when a run faults.
pub const FAULT_LINE: i64 = -1;

/// One observed execution moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceStep {
    /// 1-based line, or [`FAULT_LINE`].
    pub line_number: i64,
    pub variables: IndexMap<String, Snapshot>,
    pub call_stack: Vec<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl TraceStep {
    #[must_use]
    pub fn is_fault(&self) -> bool {
        self.line_number == FAULT_LINE
    }
}

/// The recorder already holds a fault step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sealed;

/// Append-only step sequence for one run.
#[derive(Debug, Default)]
pub struct TraceRecorder {
    steps: Vec<TraceStep>,
    faulted: bool,
}

impl TraceRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line step. Refused once a fault step has been recorded.
    pub fn push(&mut self, step: TraceStep) -> Result<(), Sealed> {
        if self.faulted {
            return Err(Sealed);
        }
        self.steps.push(step);
        Ok(())
    }

    /// Append the terminal fault step: no variables, no call stack, and
    /// `message` as both description and output.
    pub fn record_fault(&mut self, message: &str) -> Result<(), Sealed> {
        if self.faulted {
            return Err(Sealed);
        }
        self.steps.push(TraceStep {
            line_number: FAULT_LINE,
            variables: IndexMap::new(),
            call_stack: Vec::new(),
            description: message.to_string(),
            output: Some(message.to_string()),
        });
        self.faulted = true;
        Ok(())
    }

    /// Set the output of the last line step. No effect on an empty or
    /// faulted recorder.
    pub fn attach_output(&mut self, output: String) {
        if self.faulted {
            return;
        }
        if let Some(last) = self.steps.last_mut() {
            last.output = Some(output);
        }
    }

    #[must_use]
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    #[must_use]
    pub fn into_steps(self) -> Vec<TraceStep> {
        self.steps
    }

    /// Close a faulted run and hand back its steps. A recorder that is
    /// already sealed keeps its first fault step.
    #[must_use]
    pub fn finish_with_fault(mut self, message: &str) -> Vec<TraceStep> {
        if self.record_fault(message).is_err() {
            debug!(fault = message, "recorder already sealed; keeping first fault");
        }
        self.steps
    }
}
