//! `steptrace-syntax` - Lexer, layout pass, and parser for the steptrace
//! scripting language, a small indentation-sensitive subset of Python.
//!
//! - **Lexer**: Tokenizes source text into raw tokens (logos)
//! - **Layout**: Turns physical lines into logical ones with `Indent`/`Dedent`
//! - **Parser**: Recursive descent into a line-annotated [`ast::Module`]
//!
//! # Example
//!
//! ```
//! use steptrace_syntax::ast::StmtKind;
//! use steptrace_syntax::parse;
//!
//! let module = parse("seen = {}\nseen[2] = 0\n").unwrap();
//! assert_eq!(module.body.len(), 2);
//! assert_eq!(module.body[1].line, 2);
//! assert!(matches!(module.body[0].kind, StmtKind::Assign { .. }));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod ast;
mod error;
pub mod lexer;
mod line_index;
pub mod parser;

pub use error::SyntaxError;
pub use lexer::{lex, Lexer, Token, TokenKind};
pub use line_index::LineIndex;
pub use parser::parse;
