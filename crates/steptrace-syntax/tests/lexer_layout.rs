use steptrace_syntax::lexer::{layout, lex_with_text, TokenKind};

fn non_trivia_kinds(source: &str) -> Vec<TokenKind> {
    lex_with_text(source)
        .into_iter()
        .filter(|(token, _)| !token.kind.is_trivia())
        .map(|(token, _)| token.kind)
        .collect()
}

#[test]
fn comments_are_trivia() {
    let source = "x = 1  # set x\n";
    let tokens = lex_with_text(source);
    assert!(tokens
        .iter()
        .any(|(token, text)| token.kind == TokenKind::Comment && *text == "# set x"));
    assert_eq!(
        non_trivia_kinds(source),
        vec![
            TokenKind::Ident,
            TokenKind::Assign,
            TokenKind::IntLiteral,
            TokenKind::Newline
        ]
    );
}

#[test]
fn two_sum_header_tokens() {
    let texts: Vec<_> = lex_with_text("def two_sum(nums, target):")
        .into_iter()
        .filter(|(token, _)| !token.kind.is_trivia())
        .map(|(_, text)| text)
        .collect();
    assert_eq!(
        texts,
        vec!["def", "two_sum", "(", "nums", ",", "target", ")", ":"]
    );
}

#[test]
fn crlf_sources_layout_like_lf() {
    let lf: Vec<_> = layout("if a:\n    b = 1\n")
        .unwrap()
        .iter()
        .map(|t| t.kind)
        .collect();
    let crlf: Vec<_> = layout("if a:\r\n    b = 1\r\n")
        .unwrap()
        .iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(lf, crlf);
}

#[test]
fn tabs_count_to_the_next_multiple_of_eight() {
    // One tab and eight spaces are the same indentation level.
    let source = "if a:\n\tb = 1\n        c = 2\n";
    let kinds: Vec<_> = layout(source).unwrap().iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds.iter().filter(|k| **k == TokenKind::Indent).count(),
        1
    );
}

#[test]
fn invalid_character_is_reported_with_line() {
    let err = layout("a = 1\nb = $\n").unwrap_err();
    assert_eq!(err.line, 2);
    assert_eq!(err.message, "invalid character '$'");
}

#[test]
fn unmatched_closing_bracket() {
    let err = layout("x = 1)\n").unwrap_err();
    assert_eq!(err.message, "unmatched ')'");
}
