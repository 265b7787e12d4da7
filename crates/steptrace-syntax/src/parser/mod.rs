//! Recursive-descent parser.
//!
//! The parser consumes the logical token stream produced by
//! [`crate::lexer::layout`] and builds an [`ast::Module`]. Parsing stops at
//! the first error; the traced language has no use for partial trees.

mod expressions;
mod literals;
#[allow(clippy::module_inception)]
mod parser;
mod scope;
mod statements;

use crate::ast;
use crate::error::SyntaxError;

use parser::Parser;

/// Parse a complete source unit.
pub fn parse(source: &str) -> Result<ast::Module, SyntaxError> {
    let mut parser = Parser::new(source)?;
    parser.parse_module()
}
