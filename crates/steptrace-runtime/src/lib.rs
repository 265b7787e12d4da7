//! `steptrace-runtime` - Small-step interpreter for the steptrace language.
//!
//! - **Values**: Python-like runtime values with shared mutable containers
//! - **Frames**: Module and function activation records with parent links
//! - **Evaluation**: Statement and expression execution, builtins, methods
//! - **Hooks**: [`TraceHook`] receives `Call`/`Line`/`Return`/`Exception`
//!   events synchronously, before each statement runs
//!
//! # Example
//!
//! ```
//! use steptrace_runtime::{Interpreter, NoopHook};
//!
//! let mut interp = Interpreter::new();
//! let mut out = Vec::new();
//! interp
//!     .exec_source("<string>", "x = [1, 2]\nprint(len(x))\n", &mut NoopHook, &mut out)
//!     .unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "2\n");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod debug;
pub mod error;
pub mod eval;
pub mod memory;
pub mod value;

pub use debug::{Continuation, FrameView, NoopHook, TraceEvent, TraceHook};
pub use error::RuntimeError;
pub use eval::{EvalContext, Interpreter};
pub use memory::{FrameId, FrameKind, SourceId};
pub use value::Value;
