//! Token definitions for the steptrace scripting language.
//!
//! The language is a small, indentation-sensitive subset of Python. The raw
//! token stream produced here still contains whitespace, comments, and
//! physical newlines; the layout pass in [`super::layout`] turns it into the
//! logical stream (with `Newline`/`Indent`/`Dedent`) consumed by the parser.

use logos::Logos;

fn lex_double(lex: &mut logos::Lexer<TokenKind>) -> bool {
    lex_single_line(lex, b'"')
}

fn lex_single(lex: &mut logos::Lexer<TokenKind>) -> bool {
    lex_single_line(lex, b'\'')
}

/// Scan the rest of a one-line string after its opening quote. An
/// unterminated string stops before the line break and lexes as `Error`.
fn lex_single_line(lex: &mut logos::Lexer<TokenKind>, quote: u8) -> bool {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if matches!(bytes.get(i + 1), None | Some(b'\r' | b'\n')) => break,
            b'\\' => i += 2,
            b'\r' | b'\n' => break,
            byte if byte == quote => {
                lex.bump(i + 1);
                return true;
            }
            _ => i += 1,
        }
    }

    lex.bump(i.min(bytes.len()));
    false
}

fn lex_triple_double(lex: &mut logos::Lexer<TokenKind>) -> bool {
    lex_triple_quoted(lex, b'"')
}

fn lex_triple_single(lex: &mut logos::Lexer<TokenKind>) -> bool {
    lex_triple_quoted(lex, b'\'')
}

fn lex_triple_quoted(lex: &mut logos::Lexer<TokenKind>, quote: u8) -> bool {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i] == quote && bytes.get(i + 1) == Some(&quote) && bytes.get(i + 2) == Some(&quote)
        {
            lex.bump(i + 3);
            return true;
        }
        i += 1;
    }

    lex.bump(bytes.len());
    false
}

/// All raw token kinds.
///
/// Token kinds are divided into categories:
/// - Trivia (whitespace, comments, explicit line continuations)
/// - Layout (physical newlines here; indentation tokens from the layout pass)
/// - Punctuation and operators
/// - Keywords
/// - Literals and identifiers
/// - Special tokens (errors, EOF)
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[derive(Default)]
pub enum TokenKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    /// Spaces and tabs (newlines are significant and lexed separately).
    #[regex(r"[ \t\x0C]+")]
    Whitespace,

    /// Comment: `# ...` up to the end of the line.
    #[regex(r"#[^\r\n]*", allow_greedy = true)]
    Comment,

    /// Explicit line joining: a backslash directly before a newline.
    #[regex(r"\\(\r\n|\n|\r)")]
    LineContinuation,

    // =========================================================================
    // LAYOUT
    // =========================================================================
    /// Physical newline in the raw stream; logical newline after layout.
    #[regex(r"\r\n|\n|\r")]
    Newline,

    /// Indentation increase (layout pass only).
    Indent,

    /// Indentation decrease (layout pass only).
    Dedent,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,

    /// `[`
    #[token("[")]
    LBracket,

    /// `]`
    #[token("]")]
    RBracket,

    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    /// `,`
    #[token(",")]
    Comma,

    /// `:`
    #[token(":")]
    Colon,

    /// `.`
    #[token(".")]
    Dot,

    /// `;`
    #[token(";")]
    Semicolon,

    /// `->`
    #[token("->")]
    Arrow,

    // =========================================================================
    // OPERATORS - Assignment
    // =========================================================================
    /// `=`
    #[token("=")]
    Assign,

    /// `+=`
    #[token("+=")]
    PlusAssign,

    /// `-=`
    #[token("-=")]
    MinusAssign,

    /// `*=`
    #[token("*=")]
    StarAssign,

    /// `/=`
    #[token("/=")]
    SlashAssign,

    /// `//=`
    #[token("//=")]
    DoubleSlashAssign,

    /// `%=`
    #[token("%=")]
    PercentAssign,

    // =========================================================================
    // OPERATORS - Arithmetic
    // =========================================================================
    /// `+`
    #[token("+")]
    Plus,

    /// `-`
    #[token("-")]
    Minus,

    /// `*`
    #[token("*")]
    Star,

    /// `/`
    #[token("/")]
    Slash,

    /// `//`
    #[token("//")]
    DoubleSlash,

    /// `%`
    #[token("%")]
    Percent,

    /// `**`
    #[token("**")]
    DoubleStar,

    // =========================================================================
    // OPERATORS - Comparison
    // =========================================================================
    /// `==`
    #[token("==")]
    EqEq,

    /// `!=`
    #[token("!=")]
    NotEq,

    /// `<`
    #[token("<")]
    Lt,

    /// `<=`
    #[token("<=")]
    LtEq,

    /// `>`
    #[token(">")]
    Gt,

    /// `>=`
    #[token(">=")]
    GtEq,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    /// `def`
    #[token("def")]
    KwDef,

    /// `return`
    #[token("return")]
    KwReturn,

    /// `if`
    #[token("if")]
    KwIf,

    /// `elif`
    #[token("elif")]
    KwElif,

    /// `else`
    #[token("else")]
    KwElse,

    /// `while`
    #[token("while")]
    KwWhile,

    /// `for`
    #[token("for")]
    KwFor,

    /// `in`
    #[token("in")]
    KwIn,

    /// `not`
    #[token("not")]
    KwNot,

    /// `and`
    #[token("and")]
    KwAnd,

    /// `or`
    #[token("or")]
    KwOr,

    /// `is`
    #[token("is")]
    KwIs,

    /// `break`
    #[token("break")]
    KwBreak,

    /// `continue`
    #[token("continue")]
    KwContinue,

    /// `pass`
    #[token("pass")]
    KwPass,

    /// `raise`
    #[token("raise")]
    KwRaise,

    /// `None`
    #[token("None")]
    KwNone,

    /// `True`
    #[token("True")]
    KwTrue,

    /// `False`
    #[token("False")]
    KwFalse,

    // =========================================================================
    // LITERALS
    // =========================================================================
    /// Integer literal: `42`, `1_000`, `0xFF`
    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    IntLiteral,

    /// Float literal: `1.5`, `.5`, `2.`, `1e-3`
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    FloatLiteral,

    /// String literal, single or triple quoted.
    #[token("\"", lex_double)]
    #[token("'", lex_single)]
    #[token("\"\"\"", lex_triple_double)]
    #[token("'''", lex_triple_single)]
    StringLiteral,

    /// Identifier.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    /// Unrecognized input, including unterminated strings.
    #[default]
    Error,

    /// End of file marker (not produced by the lexer, added by the layout pass)
    Eof,
}

impl TokenKind {
    /// Returns `true` if this token is trivia (whitespace, comment, or continuation).
    #[inline]
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::LineContinuation
        )
    }

    /// Returns `true` for tokens that open a bracketed region.
    #[inline]
    #[must_use]
    pub fn is_open_bracket(self) -> bool {
        matches!(
            self,
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace
        )
    }

    /// Returns `true` for tokens that close a bracketed region.
    #[inline]
    #[must_use]
    pub fn is_close_bracket(self) -> bool {
        matches!(
            self,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace
        )
    }

    /// Returns `true` for augmented assignment operators (`+=`, `-=`, ...).
    #[inline]
    #[must_use]
    pub fn is_augmented_assign(self) -> bool {
        matches!(
            self,
            TokenKind::PlusAssign
                | TokenKind::MinusAssign
                | TokenKind::StarAssign
                | TokenKind::SlashAssign
                | TokenKind::DoubleSlashAssign
                | TokenKind::PercentAssign
        )
    }

    /// Human-readable description used in syntax error messages.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::Comment => "comment",
            TokenKind::LineContinuation => "line continuation",
            TokenKind::Newline => "end of line",
            TokenKind::Indent => "indent",
            TokenKind::Dedent => "dedent",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Dot => "'.'",
            TokenKind::Semicolon => "';'",
            TokenKind::Arrow => "'->'",
            TokenKind::Assign => "'='",
            TokenKind::PlusAssign => "'+='",
            TokenKind::MinusAssign => "'-='",
            TokenKind::StarAssign => "'*='",
            TokenKind::SlashAssign => "'/='",
            TokenKind::DoubleSlashAssign => "'//='",
            TokenKind::PercentAssign => "'%='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::DoubleSlash => "'//'",
            TokenKind::Percent => "'%'",
            TokenKind::DoubleStar => "'**'",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::GtEq => "'>='",
            TokenKind::KwDef => "'def'",
            TokenKind::KwReturn => "'return'",
            TokenKind::KwIf => "'if'",
            TokenKind::KwElif => "'elif'",
            TokenKind::KwElse => "'else'",
            TokenKind::KwWhile => "'while'",
            TokenKind::KwFor => "'for'",
            TokenKind::KwIn => "'in'",
            TokenKind::KwNot => "'not'",
            TokenKind::KwAnd => "'and'",
            TokenKind::KwOr => "'or'",
            TokenKind::KwIs => "'is'",
            TokenKind::KwBreak => "'break'",
            TokenKind::KwContinue => "'continue'",
            TokenKind::KwPass => "'pass'",
            TokenKind::KwRaise => "'raise'",
            TokenKind::KwNone => "'None'",
            TokenKind::KwTrue => "'True'",
            TokenKind::KwFalse => "'False'",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::FloatLiteral => "float literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Ident => "identifier",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of file",
        }
    }
}
