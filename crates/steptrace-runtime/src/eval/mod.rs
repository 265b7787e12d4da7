//! Evaluator entry point.

#![allow(missing_docs)]

use std::collections::VecDeque;
use std::io::Write;

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::debug;

use crate::debug::{Continuation, FrameView, TraceEvent, TraceHook};
use crate::error::RuntimeError;
use crate::memory::{CallStack, SourceId};
use crate::value::Value;

pub mod builtins;
pub mod call;
pub mod expr;
pub mod methods;
pub mod ops;
pub mod stmt;

/// Default limit on nested function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 100;

/// Evaluation context shared across expression and statement execution.
pub struct EvalContext<'a> {
    pub state: &'a mut Interpreter,
    /// Taken out while it runs; `None` also while no hook is installed.
    pub hook: Option<&'a mut dyn TraceHook>,
    pub out: &'a mut dyn Write,
}

impl EvalContext<'_> {
    /// Deliver `event` for the innermost frame if that frame is still traced
    /// (`Call` is always delivered).
    pub(crate) fn fire(&mut self, event: TraceEvent<'_>) {
        let Some(frame) = self.state.stack.current() else {
            return;
        };
        if !frame.traced && !matches!(event, TraceEvent::Call) {
            return;
        }
        let Some(hook) = self.hook.take() else {
            return;
        };
        let index = self.state.stack.frames().len() - 1;
        let continuation = hook.on_event(event, FrameView::new(self.state, index));
        self.hook = Some(hook);
        if continuation == Continuation::Detach {
            if let Some(frame) = self.state.stack.current_mut() {
                frame.traced = false;
            }
        }
    }

    /// Record `line` as the current line and fire a line event.
    pub(crate) fn line(&mut self, line: u32) {
        if let Some(frame) = self.state.stack.current_mut() {
            frame.line = line;
        }
        self.fire(TraceEvent::Line);
    }

    /// Write to the output sink; sink failures surface as `OSError`.
    pub(crate) fn write_out(&mut self, text: &str) -> Result<(), RuntimeError> {
        self.out
            .write_all(text.as_bytes())
            .map_err(|err| RuntimeError::Io(err.to_string().into()))
    }
}

/// Interpreter state that outlives a single run: loaded sources, the global
/// namespace, and the queue serving `input()`.
#[derive(Debug)]
pub struct Interpreter {
    sources: Vec<SmolStr>,
    globals: IndexMap<SmolStr, Value>,
    pub(crate) stack: CallStack,
    input: VecDeque<String>,
    max_call_depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            globals: IndexMap::new(),
            stack: CallStack::new(),
            input: VecDeque::new(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Limit on nested function calls before `RecursionError`.
    #[must_use]
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    #[must_use]
    pub fn max_call_depth(&self) -> usize {
        self.max_call_depth
    }

    /// Lines served to `input()`, in order; `input()` returns `''` once
    /// they run out.
    pub fn set_input<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input = lines.into_iter().map(Into::into).collect();
    }

    pub(crate) fn next_input(&mut self) -> String {
        self.input.pop_front().unwrap_or_default()
    }

    /// True if a source unit was loaded under `name`.
    #[must_use]
    pub fn has_source(&self, name: &str) -> bool {
        self.sources.iter().any(|source| source == name)
    }

    #[must_use]
    pub fn source_name(&self, id: SourceId) -> Option<&str> {
        let index = usize::try_from(id.0).ok()?;
        self.sources.get(index).map(SmolStr::as_str)
    }

    fn register_source(&mut self, name: &str) -> SourceId {
        if let Some(index) = self.sources.iter().position(|source| source == name) {
            return SourceId(u32::try_from(index).unwrap_or(u32::MAX));
        }
        self.sources.push(SmolStr::new(name));
        SourceId(u32::try_from(self.sources.len() - 1).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub fn globals(&self) -> &IndexMap<SmolStr, Value> {
        &self.globals
    }

    #[must_use]
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    pub fn set_global(&mut self, name: impl Into<SmolStr>, value: Value) {
        self.globals.insert(name.into(), value);
    }

    pub(crate) fn globals_mut(&mut self) -> &mut IndexMap<SmolStr, Value> {
        &mut self.globals
    }

    #[must_use]
    pub fn stack(&self) -> &CallStack {
        &self.stack
    }

    /// Parse `source` and execute it as module `name` against the shared
    /// global namespace.
    ///
    /// Syntax errors are reported as [`RuntimeError::Syntax`] before any
    /// event fires.
    pub fn exec_source(
        &mut self,
        name: &str,
        source: &str,
        hook: &mut dyn TraceHook,
        out: &mut dyn Write,
    ) -> Result<SourceId, RuntimeError> {
        let id = self.register_source(name);
        let module = steptrace_syntax::parse(source)?;
        debug!(source = name, statements = module.body.len(), "executing module");

        self.stack.push_module(id);
        let mut ctx = EvalContext {
            state: self,
            hook: Some(hook),
            out,
        };
        ctx.fire(TraceEvent::Call);
        let result = stmt::exec_block(&mut ctx, &module.body);
        match &result {
            Ok(_) => ctx.fire(TraceEvent::Return(&Value::None)),
            Err(err) => ctx.fire(TraceEvent::Exception(err)),
        }
        self.stack.clear();
        result.map(|_| id)
    }

    /// Call the global callable `name` with positional arguments.
    pub fn call(
        &mut self,
        name: &str,
        args: Vec<Value>,
        hook: &mut dyn TraceHook,
        out: &mut dyn Write,
    ) -> Result<Value, RuntimeError> {
        let callee = self
            .globals
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedName(name.into()))?;
        let mut ctx = EvalContext {
            state: self,
            hook: Some(hook),
            out,
        };
        let result = call::call_value(&mut ctx, &callee, args, Vec::new());
        self.stack.clear();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::NoopHook;

    #[test]
    fn sources_are_registered_once() {
        let mut interp = Interpreter::new();
        let mut out = Vec::new();
        let first = interp
            .exec_source("<string>", "x = 1\n", &mut NoopHook, &mut out)
            .unwrap();
        let second = interp
            .exec_source("<string>", "y = x + 1\n", &mut NoopHook, &mut out)
            .unwrap();
        assert_eq!(first, second);
        assert!(interp.has_source("<string>"));
        assert!(!interp.has_source("<prelude>"));
        assert_eq!(interp.global("y").map(Value::repr), Some("2".into()));
    }

    #[test]
    fn input_queue_drains_to_empty_strings() {
        let mut interp = Interpreter::new();
        interp.set_input(["5", "hello"]);
        assert_eq!(interp.next_input(), "5");
        assert_eq!(interp.next_input(), "hello");
        assert_eq!(interp.next_input(), "");
    }
}
