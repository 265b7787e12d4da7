//! `steptrace-tracer` - Statement-level execution tracer.
//!
//! Runs a unit of traced-language source under an instrumentation hook and
//! records one [`TraceStep`] per executed line:
//!
//! - **Hook**: [`EventHook`] filters runtime events to the traced source
//! - **Snapshots**: [`Snapshotter`] copies locals into owned JSON-shaped values
//! - **Call stack**: [`CallStackTracker`] walks parent frames, outermost first
//! - **Output**: [`OutputCapture`] buffers everything the traced unit prints
//! - **Driver**: [`Driver`] sequences a run and turns an uncaught fault into
//!   the synthetic final step
//! - **Emission**: [`render_trace`] / [`extract_trace`] speak the
//!   `TRACE_START` / `TRACE_END` payload format
//!
//! # Example
//!
//! ```
//! use steptrace_tracer::{render_trace, trace};
//!
//! let outcome = trace("x = 1\nprint(x)\n").unwrap();
//! assert_eq!(outcome.steps.len(), 2);
//! assert_eq!(outcome.steps[1].output.as_deref(), Some("1\n"));
//! assert!(render_trace(&outcome.steps).unwrap().starts_with("TRACE_START\n"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod callstack;
pub mod capture;
pub mod config;
pub mod driver;
pub mod emit;
pub mod error;
pub mod hook;
pub mod recorder;
pub mod snapshot;
pub mod source;

pub use callstack::CallStackTracker;
pub use capture::OutputCapture;
pub use config::TraceConfig;
pub use driver::{trace, Driver, DriverState, Prelude, TraceFault, TraceOutcome, TraceRequest};
pub use emit::{extract_trace, render_trace, write_trace, TRACE_END, TRACE_START};
pub use error::TraceError;
pub use hook::EventHook;
pub use recorder::{TraceRecorder, TraceStep, FAULT_LINE};
pub use snapshot::{Snapshot, Snapshotter};
pub use source::SourceRegistry;
