//! Call frames.

#![allow(missing_docs)]

use std::rc::Rc;

use indexmap::IndexMap;
use smol_str::SmolStr;
use steptrace_syntax::ast::FunctionDef;

use crate::value::Value;

/// Frame identifier, unique for the lifetime of an interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u32);

/// Identity of a loaded source unit (`<string>`, `<prelude>`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Top-level code of a source unit; its variables are the globals.
    Module,
    Function,
}

/// One activation record.
#[derive(Debug)]
pub struct Frame {
    pub id: FrameId,
    pub name: SmolStr,
    pub source: SourceId,
    pub kind: FrameKind,
    /// Function locals in binding order. Always empty for module frames.
    pub locals: IndexMap<SmolStr, Value>,
    pub line: u32,
    pub parent: Option<FrameId>,
    /// Cleared when the hook detaches from this frame.
    pub traced: bool,
    pub(crate) def: Option<Rc<FunctionDef>>,
}

impl Frame {
    /// True if `name` is local to this function frame (assigned anywhere in
    /// its body), whether or not it is bound yet.
    #[must_use]
    pub fn is_local(&self, name: &str) -> bool {
        self.def
            .as_ref()
            .is_some_and(|def| def.locals.contains(name))
    }
}

/// Active frames, innermost last.
#[derive(Debug, Default)]
pub struct CallStack {
    frames: Vec<Frame>,
    next_id: u32,
    function_depth: usize,
}

impl CallStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_module(&mut self, source: SourceId) -> FrameId {
        self.push(Frame {
            id: FrameId(0),
            name: SmolStr::new_static("<module>"),
            source,
            kind: FrameKind::Module,
            locals: IndexMap::new(),
            line: 0,
            parent: None,
            traced: true,
            def: None,
        })
    }

    pub fn push_function(
        &mut self,
        def: Rc<FunctionDef>,
        source: SourceId,
        locals: IndexMap<SmolStr, Value>,
    ) -> FrameId {
        self.function_depth += 1;
        self.push(Frame {
            id: FrameId(0),
            name: def.name.clone(),
            source,
            kind: FrameKind::Function,
            locals,
            line: def.line,
            parent: None,
            traced: true,
            def: Some(def),
        })
    }

    fn push(&mut self, mut frame: Frame) -> FrameId {
        let id = FrameId(self.next_id);
        self.next_id += 1;
        frame.id = id;
        frame.parent = self.frames.last().map(|parent| parent.id);
        self.frames.push(frame);
        id
    }

    pub fn pop(&mut self) -> Option<Frame> {
        let frame = self.frames.pop()?;
        if frame.kind == FrameKind::Function {
            self.function_depth -= 1;
        }
        Some(frame)
    }

    #[must_use]
    pub fn current(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of active function frames.
    #[must_use]
    pub fn function_depth(&self) -> usize {
        self.function_depth
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.frames.clear();
        self.function_depth = 0;
    }
}
