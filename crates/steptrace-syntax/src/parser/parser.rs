//! Token cursor shared by the statement and expression grammars.

use smol_str::SmolStr;

use crate::error::SyntaxError;
use crate::lexer::{layout, token_text, Token, TokenKind};
use crate::line_index::LineIndex;

/// Limit on nested expressions (brackets, unary chains, conditionals).
const MAX_NESTING: u32 = 100;

pub(crate) struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    index: LineIndex,
    pub(super) loop_depth: u32,
    pub(super) function_depth: u32,
    nesting: u32,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(source: &'src str) -> Result<Self, SyntaxError> {
        let tokens = layout(source)?;
        Ok(Self {
            source,
            tokens,
            pos: 0,
            index: LineIndex::new(source),
            loop_depth: 0,
            function_depth: 0,
            nesting: 0,
        })
    }

    /// Current token; the stream always ends with `Eof`, which is sticky.
    pub(super) fn current(&self) -> Token {
        let last = self.tokens.len().saturating_sub(1);
        self.tokens[self.pos.min(last)]
    }

    pub(super) fn kind(&self) -> TokenKind {
        self.current().kind
    }

    pub(super) fn nth(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |token| token.kind)
    }

    pub(super) fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    pub(super) fn bump(&mut self) -> Token {
        let token = self.current();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    pub(super) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, SyntaxError> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(what))
        }
    }

    /// Run `parse` one nesting level deeper.
    pub(super) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        if self.nesting >= MAX_NESTING {
            return Err(self.error_here("expression is nested too deeply"));
        }
        self.nesting += 1;
        let result = parse(self);
        self.nesting -= 1;
        result
    }

    pub(super) fn text(&self, token: &Token) -> &'src str {
        token_text(self.source, token)
    }

    pub(super) fn ident(&self, token: &Token) -> SmolStr {
        SmolStr::new(self.text(token))
    }

    /// Line of the current token.
    pub(super) fn line(&self) -> u32 {
        self.line_of(&self.current())
    }

    pub(super) fn line_of(&self, token: &Token) -> u32 {
        self.index.line(token.range.start())
    }

    pub(super) fn error_here(&self, message: impl Into<SmolStr>) -> SyntaxError {
        SyntaxError::new(self.line(), message)
    }

    pub(super) fn unexpected(&self, expected: &str) -> SyntaxError {
        let token = self.current();
        let found = match token.kind {
            TokenKind::Ident | TokenKind::IntLiteral | TokenKind::FloatLiteral => {
                format!("'{}'", self.text(&token))
            }
            kind => kind.describe().to_string(),
        };
        self.error_here(format!("invalid syntax: expected {expected}, found {found}"))
    }
}
