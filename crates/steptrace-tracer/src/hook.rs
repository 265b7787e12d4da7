//! The instrumentation hook installed for a traced run.

#![allow(missing_docs)]

use smol_str::SmolStr;
use steptrace_runtime::{Continuation, FrameView, TraceEvent, TraceHook};
use tracing::trace;

use crate::callstack::CallStackTracker;
use crate::config::TraceConfig;
use crate::recorder::{TraceRecorder, TraceStep};
use crate::snapshot::Snapshotter;
use crate::source::SourceRegistry;

/// Records one [`TraceStep`] per line event of the traced source.
///
/// Frames of any other source (the host prelude) are detached on entry, so
/// the runtime stops delivering their line events altogether.
#[derive(Debug)]
pub struct EventHook {
    source_name: SmolStr,
    registry: SourceRegistry,
    snapshotter: Snapshotter,
    tracker: CallStackTracker,
    recorder: TraceRecorder,
}

impl EventHook {
    #[must_use]
    pub fn new(config: &TraceConfig, registry: SourceRegistry, snapshotter: Snapshotter) -> Self {
        Self {
            source_name: config.source_name.clone(),
            registry,
            snapshotter,
            tracker: CallStackTracker::new(config.source_name.clone(), config.max_call_stack),
            recorder: TraceRecorder::new(),
        }
    }

    #[must_use]
    pub fn recorder(&self) -> &TraceRecorder {
        &self.recorder
    }

    #[must_use]
    pub fn into_recorder(self) -> TraceRecorder {
        self.recorder
    }

    fn is_traced(&self, frame: &FrameView<'_>) -> bool {
        frame.source_name() == self.source_name
    }

    fn record_line(&mut self, frame: FrameView<'_>) {
        let line = usize::try_from(frame.line()).unwrap_or(usize::MAX);
        if line == 0 || line > self.registry.len() {
            trace!(line, lines = self.registry.len(), "line event outside the traced source");
            return;
        }
        let step = TraceStep {
            line_number: i64::from(frame.line()),
            variables: self.snapshotter.variables(frame.locals()),
            call_stack: self.tracker.collect(frame),
            description: self.registry.describe(line),
            output: None,
        };
        if self.recorder.push(step).is_err() {
            trace!(line, "recorder sealed; line event ignored");
        }
    }
}

impl TraceHook for EventHook {
    fn on_event(&mut self, event: TraceEvent<'_>, frame: FrameView<'_>) -> Continuation {
        match event {
            TraceEvent::Call if !self.is_traced(&frame) => Continuation::Detach,
            TraceEvent::Line if self.is_traced(&frame) => {
                self.record_line(frame);
                Continuation::Continue
            }
            _ => Continuation::Continue,
        }
    }
}
