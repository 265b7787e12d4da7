//! Runtime faults.

#![allow(missing_docs)]

use smol_str::SmolStr;
use steptrace_syntax::SyntaxError;
use thiserror::Error;

/// A fault raised while executing traced code.
///
/// Every variant maps onto the exception class a Python programmer would
/// expect (see [`RuntimeError::class_name`]); `Display` renders the message
/// only, without the class prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("{0}")]
    ZeroDivision(SmolStr),

    #[error("name '{0}' is not defined")]
    UndefinedName(SmolStr),

    #[error("cannot access local variable '{0}' where it is not associated with a value")]
    UnboundLocal(SmolStr),

    #[error("{0}")]
    Type(SmolStr),

    #[error("{0}")]
    Index(SmolStr),

    /// Message is the repr of the missing key.
    #[error("{0}")]
    Key(SmolStr),

    #[error("{0}")]
    Value(SmolStr),

    #[error("{0}")]
    Attribute(SmolStr),

    #[error("{0}")]
    Overflow(SmolStr),

    #[error("maximum recursion depth exceeded")]
    Recursion,

    /// Exception raised explicitly by traced code (`raise ValueError('x')`).
    #[error("{message}")]
    Raised { class: SmolStr, message: SmolStr },

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The output sink rejected a write.
    #[error("{0}")]
    Io(SmolStr),
}

impl RuntimeError {
    /// Python exception class name for this fault.
    #[must_use]
    pub fn class_name(&self) -> &str {
        match self {
            RuntimeError::ZeroDivision(_) => "ZeroDivisionError",
            RuntimeError::UndefinedName(_) => "NameError",
            RuntimeError::UnboundLocal(_) => "UnboundLocalError",
            RuntimeError::Type(_) => "TypeError",
            RuntimeError::Index(_) => "IndexError",
            RuntimeError::Key(_) => "KeyError",
            RuntimeError::Value(_) => "ValueError",
            RuntimeError::Attribute(_) => "AttributeError",
            RuntimeError::Overflow(_) => "OverflowError",
            RuntimeError::Recursion => "RecursionError",
            RuntimeError::Raised { class, .. } => class,
            RuntimeError::Syntax(_) => "SyntaxError",
            RuntimeError::Io(_) => "OSError",
        }
    }

    /// `"<Class>: <message>"`, or just the class when the message is empty.
    #[must_use]
    pub fn describe(&self) -> String {
        let message = self.to_string();
        if message.is_empty() {
            self.class_name().to_string()
        } else {
            format!("{}: {message}", self.class_name())
        }
    }

    pub(crate) fn type_error(message: impl Into<SmolStr>) -> Self {
        RuntimeError::Type(message.into())
    }

    pub(crate) fn value_error(message: impl Into<SmolStr>) -> Self {
        RuntimeError::Value(message.into())
    }

    pub(crate) fn index_error(message: impl Into<SmolStr>) -> Self {
        RuntimeError::Index(message.into())
    }

    pub(crate) fn overflow() -> Self {
        RuntimeError::Overflow("integer overflow".into())
    }
}
