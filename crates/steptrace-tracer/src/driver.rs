//! Run orchestration.
//!
//! A [`Driver`] moves through `Idle -> Tracing -> Completed | Faulted ->
//! Finalized`. Setup problems (configuration, host prelude, hook
//! installation) are returned as [`TraceError`] while the driver is still
//! idle. Faults raised by the traced code are caught once, here, and turned
//! into the synthetic final step.
//!
//! Each run executes on its own thread with a stack sized from
//! `max_call_depth`, so deep traced recursion never depends on the caller's
//! stack.

#![allow(missing_docs)]

use std::fmt;

use smol_str::SmolStr;
use steptrace_runtime::{Interpreter, NoopHook, RuntimeError, Value};
use tracing::{debug, info};

use crate::capture::OutputCapture;
use crate::config::{TraceConfig, PRELUDE_SOURCE_NAME};
use crate::error::TraceError;
use crate::hook::EventHook;
use crate::recorder::TraceStep;
use crate::snapshot::Snapshotter;
use crate::source::SourceRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Tracing,
    Completed,
    Faulted,
    Finalized,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverState::Idle => "idle",
            DriverState::Tracing => "tracing",
            DriverState::Completed => "completed",
            DriverState::Faulted => "faulted",
            DriverState::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// Helper source loaded before the traced unit, under its own identity.
#[derive(Debug, Clone)]
pub struct Prelude {
    pub name: SmolStr,
    pub source: String,
}

/// Native stack reserved per permitted interpreter call level.
const STACK_PER_CALL: usize = 256 * 1024;
/// Smallest stack a tracing thread gets.
const MIN_TRACE_STACK: usize = 16 * 1024 * 1024;

fn trace_stack_size(max_call_depth: usize) -> usize {
    max_call_depth
        .saturating_mul(STACK_PER_CALL)
        .max(MIN_TRACE_STACK)
}

/// What to trace.
#[derive(Debug, Clone, Default)]
pub struct TraceRequest {
    pub source: String,
    /// Global function called after the source has run.
    pub entry: Option<SmolStr>,
    /// Entry-point arguments; arrays become lists and objects dicts.
    pub args: Vec<serde_json::Value>,
    /// Lines served to `input()`.
    pub input: Vec<String>,
    pub prelude: Option<Prelude>,
}

impl TraceRequest {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_entry(mut self, name: impl Into<SmolStr>, args: Vec<serde_json::Value>) -> Self {
        self.entry = Some(name.into());
        self.args = args;
        self
    }

    #[must_use]
    pub fn with_input<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Load `source` as the host prelude under the default prelude name.
    #[must_use]
    pub fn with_prelude(self, source: impl Into<String>) -> Self {
        self.with_named_prelude(PRELUDE_SOURCE_NAME, source)
    }

    #[must_use]
    pub fn with_named_prelude(mut self, name: impl Into<SmolStr>, source: impl Into<String>) -> Self {
        self.prelude = Some(Prelude {
            name: name.into(),
            source: source.into(),
        });
        self
    }
}

/// Uncaught fault that ended a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceFault {
    pub class: String,
    pub message: String,
}

impl TraceFault {
    fn from_error(err: &RuntimeError) -> Self {
        Self {
            class: err.class_name().to_string(),
            message: err.to_string(),
        }
    }

    /// `"<Class>: <message>"`, or the bare class for an empty message.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.message.is_empty() {
            self.class.clone()
        } else {
            format!("{}: {}", self.class, self.message)
        }
    }
}

/// Result of a finished run.
#[derive(Debug, Clone)]
pub struct TraceOutcome {
    pub steps: Vec<TraceStep>,
    /// Everything the traced unit printed.
    pub stdout: String,
    pub fault: Option<TraceFault>,
    /// Repr of the entry point's return value.
    pub return_value: Option<String>,
}

impl TraceOutcome {
    #[must_use]
    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }
}

/// Executes one traced run.
#[derive(Debug)]
pub struct Driver {
    config: TraceConfig,
    state: DriverState,
}

impl Driver {
    #[must_use]
    pub fn new(config: TraceConfig) -> Self {
        Self {
            config,
            state: DriverState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> DriverState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    fn transition(&mut self, next: DriverState) {
        debug!(from = %self.state, to = %next, "driver state");
        self.state = next;
    }

    /// Trace `request` to completion on a dedicated tracing thread.
    pub fn run(&mut self, request: TraceRequest) -> Result<TraceOutcome, TraceError> {
        if self.state != DriverState::Idle {
            return Err(TraceError::NotIdle(self.state));
        }
        self.config.validate()?;
        let stack_size = trace_stack_size(self.config.max_call_depth);

        std::thread::scope(|scope| {
            let worker = std::thread::Builder::new()
                .name("steptrace".into())
                .stack_size(stack_size)
                .spawn_scoped(scope, move || self.execute(request))?;
            match worker.join() {
                Ok(result) => result,
                Err(payload) => std::panic::resume_unwind(payload),
            }
        })
    }

    fn execute(&mut self, request: TraceRequest) -> Result<TraceOutcome, TraceError> {
        let config = &self.config;

        let mut interp = Interpreter::new().with_max_call_depth(config.max_call_depth);
        interp.set_input(request.input);
        let mut capture = OutputCapture::new();
        let mut snapshotter = Snapshotter::new(config);

        if let Some(prelude) = &request.prelude {
            interp
                .exec_source(&prelude.name, &prelude.source, &mut NoopHook, &mut capture)
                .map_err(|err| TraceError::Prelude(err.describe()))?;
            for name in interp.globals().keys() {
                snapshotter.exclude(name.clone());
            }
            debug!(prelude = %prelude.name, globals = interp.globals().len(), "host prelude loaded");
        }
        if interp.has_source(&config.source_name) {
            return Err(TraceError::HookInstall(config.source_name.clone()));
        }

        let registry = SourceRegistry::new(&request.source);
        let text = registry.text().to_string();
        info!(
            source = %config.source_name,
            lines = registry.len(),
            entry = request.entry.as_deref().unwrap_or_default(),
            "trace started"
        );
        let source_name = config.source_name.clone();
        let args: Vec<Value> = request.args.iter().map(Value::from_json).collect();
        let mut hook = EventHook::new(config, registry, snapshotter);

        self.transition(DriverState::Tracing);
        capture.activate();
        let result = interp
            .exec_source(&source_name, &text, &mut hook, &mut capture)
            .and_then(|_| match &request.entry {
                Some(entry) => interp
                    .call(entry, args, &mut hook, &mut capture)
                    .map(|value| Some(value.repr())),
                None => Ok(None),
            });
        capture.deactivate();
        debug!(dropped = capture.dropped(), "output capture closed");

        let mut recorder = hook.into_recorder();
        let (steps, return_value, fault) = match result {
            Ok(return_value) => {
                self.transition(DriverState::Completed);
                recorder.attach_output(capture.contents());
                (recorder.into_steps(), return_value, None)
            }
            Err(err) => {
                self.transition(DriverState::Faulted);
                debug!(fault = %err.describe(), "traced code faulted");
                let steps = recorder.finish_with_fault(&err.describe());
                (steps, None, Some(TraceFault::from_error(&err)))
            }
        };
        self.transition(DriverState::Finalized);

        let outcome = TraceOutcome {
            steps,
            stdout: capture.into_string(),
            fault,
            return_value,
        };
        info!(
            steps = outcome.steps.len(),
            faulted = outcome.is_faulted(),
            "trace finished"
        );
        Ok(outcome)
    }
}

/// Trace `source` with the default configuration.
pub fn trace(source: &str) -> Result<TraceOutcome, TraceError> {
    Driver::new(TraceConfig::default()).run(TraceRequest::new(source))
}
