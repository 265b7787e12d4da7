//! Read-only frame access for hooks.

#![allow(missing_docs)]

use indexmap::map::Iter;
use smol_str::SmolStr;

use crate::eval::Interpreter;
use crate::memory::{Frame, FrameKind, SourceId};
use crate::value::Value;

/// A frame on the live call stack, as seen from a hook.
#[derive(Clone, Copy)]
pub struct FrameView<'a> {
    state: &'a Interpreter,
    index: usize,
}

impl<'a> FrameView<'a> {
    pub(crate) fn new(state: &'a Interpreter, index: usize) -> Self {
        Self { state, index }
    }

    fn frame(&self) -> &'a Frame {
        &self.state.stack().frames()[self.index]
    }

    /// Function name, or `<module>` for top-level code.
    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.frame().name
    }

    #[must_use]
    pub fn kind(&self) -> FrameKind {
        self.frame().kind
    }

    #[must_use]
    pub fn is_module(&self) -> bool {
        self.kind() == FrameKind::Module
    }

    /// Line currently executing in this frame (the call site for callers).
    #[must_use]
    pub fn line(&self) -> u32 {
        self.frame().line
    }

    #[must_use]
    pub fn source(&self) -> SourceId {
        self.frame().source
    }

    /// Name the frame's source unit was loaded under.
    #[must_use]
    pub fn source_name(&self) -> &'a str {
        self.state.source_name(self.source()).unwrap_or_default()
    }

    /// Variable bindings visible as locals: the function's locals, or the
    /// globals for a module frame.
    #[must_use]
    pub fn locals(&self) -> Iter<'a, SmolStr, Value> {
        match self.kind() {
            FrameKind::Module => self.state.globals().iter(),
            FrameKind::Function => self.frame().locals.iter(),
        }
    }

    /// The calling frame, found through the parent link.
    #[must_use]
    pub fn back(&self) -> Option<FrameView<'a>> {
        let parent = self.frame().parent?;
        let frames = self.state.stack().frames();
        let index = frames[..self.index]
            .iter()
            .rposition(|frame| frame.id == parent)?;
        Some(FrameView::new(self.state, index))
    }
}

impl std::fmt::Debug for FrameView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameView")
            .field("name", &self.name())
            .field("line", &self.line())
            .field("source", &self.source_name())
            .finish()
    }
}
