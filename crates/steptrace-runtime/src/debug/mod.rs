//! Instrumentation hooks.

#![allow(missing_docs)]

mod frame;
mod hook;

pub use frame::FrameView;
pub use hook::{Continuation, NoopHook, TraceEvent, TraceHook};
