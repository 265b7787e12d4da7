//! Lexer for the steptrace scripting language.
//!
//! This module provides a lexer that tokenizes source code into a stream
//! of raw tokens with their positions in the source text, plus the layout
//! pass that turns physical lines and indentation into logical tokens.

mod layout;
mod tokens;

pub use layout::layout;
pub use tokens::TokenKind;

use logos::Logos;
use text_size::{TextRange, TextSize};

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The byte range of the token in the source text.
    pub range: TextRange,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, range: TextRange) -> Self {
        Self { kind, range }
    }

    /// Creates a zero-width token at `offset` (used for layout tokens).
    #[must_use]
    pub fn empty(kind: TokenKind, offset: TextSize) -> Self {
        Self {
            kind,
            range: TextRange::empty(offset),
        }
    }

    /// Returns the length of the token in bytes.
    #[must_use]
    pub fn len(&self) -> TextSize {
        self.range.len()
    }

    /// Returns true if the token has zero length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Lexer for source code.
///
/// The lexer is an iterator over raw tokens. It handles all error recovery
/// internally - any unrecognized characters are returned as `TokenKind::Error`.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
        }
    }

    /// Returns the source text being lexed.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Returns the text of the current token.
    #[must_use]
    pub fn slice(&self) -> &'src str {
        self.inner.slice()
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.inner.next()?;
        let span = self.inner.span();
        let kind = kind.unwrap_or(TokenKind::Error);
        let range = TextRange::new(
            TextSize::from(span.start as u32),
            TextSize::from(span.end as u32),
        );
        Some(Token::new(kind, range))
    }
}

/// Lex the entire source and return all raw tokens.
///
/// This is a convenience function for testing and simple use cases.
/// For the parser, use [`layout`] which produces the logical token stream.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Lex source and return tokens paired with their text.
///
/// Useful for debugging and testing.
#[must_use]
pub fn lex_with_text(source: &str) -> Vec<(Token, &str)> {
    Lexer::new(source)
        .map(|token| (token, token_text(source, &token)))
        .collect()
}

/// Returns the slice of `source` covered by `token`.
#[must_use]
pub fn token_text<'a>(source: &'a str, token: &Token) -> &'a str {
    &source[usize::from(token.range.start())..usize::from(token.range.end())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_basic() {
        let source = "x = 42";
        let tokens = lex(source);

        // x, whitespace, =, whitespace, 42
        let non_trivia: Vec<_> = tokens.iter().filter(|t| !t.kind.is_trivia()).collect();
        assert_eq!(non_trivia.len(), 3);
        assert_eq!(non_trivia[0].kind, TokenKind::Ident);
        assert_eq!(non_trivia[1].kind, TokenKind::Assign);
        assert_eq!(non_trivia[2].kind, TokenKind::IntLiteral);
    }

    #[test]
    fn test_lexer_preserves_positions() {
        let source = "abc = 123";
        let tokens = lex(source);

        assert_eq!(tokens[0].range, TextRange::new(0.into(), 3.into()));
        assert_eq!(tokens[1].range, TextRange::new(3.into(), 4.into()));
        assert_eq!(tokens[2].range, TextRange::new(4.into(), 5.into()));
    }

    #[test]
    fn test_lex_with_text() {
        let source = "seen[num] = i";
        let tokens = lex_with_text(source);

        let non_trivia: Vec<_> = tokens.iter().filter(|(t, _)| !t.kind.is_trivia()).collect();
        let texts: Vec<_> = non_trivia.iter().map(|(_, text)| *text).collect();
        assert_eq!(texts, vec!["seen", "[", "num", "]", "=", "i"]);
    }

    #[test]
    fn test_newlines_are_not_trivia() {
        let tokens = lex("a\nb\r\nc");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                TokenKind::Newline,
                TokenKind::Ident,
                TokenKind::Newline,
                TokenKind::Ident
            ]
        );
    }
}
