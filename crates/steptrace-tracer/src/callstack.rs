//! Call-chain reconstruction from parent-frame links.

#![allow(missing_docs)]

use smol_str::SmolStr;
use steptrace_runtime::FrameView;

/// Collects the traced functions enclosing a frame, outermost first.
#[derive(Debug, Clone)]
pub struct CallStackTracker {
    source_name: SmolStr,
    max: usize,
}

impl CallStackTracker {
    #[must_use]
    pub fn new(source_name: impl Into<SmolStr>, max: usize) -> Self {
        Self {
            source_name: source_name.into(),
            max,
        }
    }

    /// Identifiers (`name()`) of the function frames of the traced source
    /// from `frame` outward, capped at the configured maximum and reversed
    /// so the outermost caller comes first.
    ///
    /// The cap keeps the innermost frames.
    #[must_use]
    pub fn collect(&self, frame: FrameView<'_>) -> Vec<String> {
        let mut stack = Vec::new();
        let mut current = Some(frame);
        while let Some(view) = current {
            if stack.len() >= self.max {
                break;
            }
            if !view.is_module() && view.source_name() == self.source_name {
                stack.push(format!("{}()", view.name()));
            }
            current = view.back();
        }
        stack.reverse();
        stack
    }
}
