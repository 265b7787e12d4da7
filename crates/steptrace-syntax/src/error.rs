//! Syntax errors.

use smol_str::SmolStr;
use thiserror::Error;

/// A lexing or parsing error with the 1-based line it was detected on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (line {line})")]
pub struct SyntaxError {
    /// 1-based line of the offending token.
    pub line: u32,
    /// Error message without location.
    pub message: SmolStr,
}

impl SyntaxError {
    /// Creates a new syntax error.
    #[must_use]
    pub fn new(line: u32, message: impl Into<SmolStr>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}
