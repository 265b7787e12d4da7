//! Trace hook trait.

#![allow(missing_docs)]

use crate::error::RuntimeError;
use crate::value::Value;

use super::FrameView;

/// Execution event delivered to a [`TraceHook`].
#[derive(Debug, Clone, Copy)]
pub enum TraceEvent<'a> {
    /// A frame was entered. Returning [`Continuation::Detach`] disables
    /// every further event for that frame.
    Call,
    /// A statement (or loop header, or `elif` test) is about to run.
    Line,
    /// The frame is returning this value.
    Return(&'a Value),
    /// A fault is propagating out of the frame.
    Exception(&'a RuntimeError),
}

/// What the runtime should do with the frame after the hook returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Continuation {
    #[default]
    Continue,
    /// Stop delivering events for the frame that received the event.
    Detach,
}

/// Statement-level instrumentation.
///
/// The runtime invokes the hook synchronously and takes it out of the
/// evaluation context for the duration of the call, so a hook never
/// observes its own execution.
pub trait TraceHook {
    fn on_event(&mut self, event: TraceEvent<'_>, frame: FrameView<'_>) -> Continuation;
}

/// No-op hook for untraced runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl TraceHook for NoopHook {
    fn on_event(&mut self, _event: TraceEvent<'_>, _frame: FrameView<'_>) -> Continuation {
        Continuation::Continue
    }
}
