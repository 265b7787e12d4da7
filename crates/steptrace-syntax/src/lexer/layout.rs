//! Layout pass: physical lines and indentation to logical tokens.
//!
//! Trivia is dropped, newlines inside brackets are joined, blank and
//! comment-only lines vanish, and indentation changes become `Indent` /
//! `Dedent` tokens. The stream always ends with the closing `Newline` of the
//! last logical line, any pending `Dedent`s, and `Eof`.

use text_size::TextSize;

use super::{token_text, Lexer, Token, TokenKind};
use crate::error::SyntaxError;
use crate::line_index::LineIndex;

const TAB_WIDTH: usize = 8;

/// Deepest block nesting accepted.
const MAX_INDENT_LEVELS: usize = 100;

/// Produce the logical token stream consumed by the parser.
pub fn layout(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let index = LineIndex::new(source);
    let mut out = Vec::new();
    let mut indents: Vec<usize> = vec![0];
    let mut open_brackets: Vec<Token> = Vec::new();
    let mut at_line_start = true;

    for token in Lexer::new(source) {
        if token.kind.is_trivia() {
            continue;
        }
        match token.kind {
            TokenKind::Newline => {
                if open_brackets.is_empty() && !at_line_start {
                    out.push(token);
                    at_line_start = true;
                }
                continue;
            }
            TokenKind::Error => return Err(invalid_token(source, &index, &token)),
            _ => {}
        }

        if at_line_start && open_brackets.is_empty() {
            let start = token.range.start();
            let width = indentation_width(source, index.line_start(start), start);
            let current = indents.last().copied().unwrap_or(0);
            if width > current {
                if indents.len() > MAX_INDENT_LEVELS {
                    return Err(SyntaxError::new(
                        index.line(start),
                        "too many levels of indentation",
                    ));
                }
                indents.push(width);
                out.push(Token::empty(TokenKind::Indent, start));
            } else if width < current {
                while indents.last().is_some_and(|level| *level > width) {
                    indents.pop();
                    out.push(Token::empty(TokenKind::Dedent, start));
                }
                if indents.last().copied() != Some(width) {
                    return Err(SyntaxError::new(
                        index.line(start),
                        "unindent does not match any outer indentation level",
                    ));
                }
            }
            at_line_start = false;
        }

        if token.kind.is_open_bracket() {
            open_brackets.push(token);
        } else if token.kind.is_close_bracket() && open_brackets.pop().is_none() {
            return Err(SyntaxError::new(
                index.line(token.range.start()),
                format!("unmatched {}", token.kind.describe()),
            ));
        }
        out.push(token);
    }

    if let Some(open) = open_brackets.first() {
        return Err(SyntaxError::new(
            index.line(open.range.start()),
            format!("{} was never closed", open.kind.describe()),
        ));
    }

    let end = TextSize::of(source);
    if !at_line_start {
        out.push(Token::empty(TokenKind::Newline, end));
    }
    while indents.len() > 1 {
        indents.pop();
        out.push(Token::empty(TokenKind::Dedent, end));
    }
    out.push(Token::empty(TokenKind::Eof, end));
    Ok(out)
}

fn indentation_width(source: &str, line_start: TextSize, token_start: TextSize) -> usize {
    let prefix = &source[usize::from(line_start)..usize::from(token_start)];
    prefix.chars().fold(0, |width, ch| match ch {
        '\t' => (width / TAB_WIDTH + 1) * TAB_WIDTH,
        '\x0C' => 0,
        _ => width + 1,
    })
}

fn invalid_token(source: &str, index: &LineIndex, token: &Token) -> SyntaxError {
    let text = token_text(source, token);
    let line = index.line(token.range.start());
    match text.chars().next() {
        Some('"' | '\'') => SyntaxError::new(line, "unterminated string literal"),
        Some(ch) => SyntaxError::new(line, format!("invalid character '{ch}'")),
        None => SyntaxError::new(line, "invalid syntax"),
    }
}
