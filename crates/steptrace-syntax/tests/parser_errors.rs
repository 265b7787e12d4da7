use steptrace_syntax::parse;

fn error(source: &str) -> (u32, String) {
    let err = parse(source).expect_err("source should be rejected");
    (err.line, err.message.to_string())
}

#[test]
fn return_outside_function() {
    assert_eq!(error("x = 1\nreturn x\n"), (2, "'return' outside function".into()));
}

#[test]
fn break_outside_loop() {
    assert_eq!(error("break\n"), (1, "'break' outside loop".into()));
    // A def resets the loop context.
    let (line, message) = error("while True:\n    def f():\n        continue\n");
    assert_eq!(line, 3);
    assert_eq!(message, "'continue' not properly in loop");
}

#[test]
fn missing_indented_block() {
    let (line, message) = error("if x:\npass\n");
    assert_eq!(line, 2);
    assert_eq!(message, "expected an indented block");
}

#[test]
fn unexpected_indent() {
    let (line, message) = error("a = 1\n    b = 2\n");
    assert_eq!(line, 2);
    assert_eq!(message, "unexpected indent");
}

#[test]
fn invalid_assignment_targets() {
    assert_eq!(error("1 = x\n").1, "cannot assign to literal");
    assert_eq!(error("f() = x\n").1, "cannot assign to function call");
    assert_eq!(error("a + b = 1\n").1, "cannot assign to expression");
    assert_eq!(
        error("a, b += 1\n").1,
        "illegal expression for augmented assignment"
    );
}

#[test]
fn parameter_errors() {
    assert_eq!(
        error("def f(a=1, b):\n    pass\n").1,
        "non-default argument follows default argument"
    );
    assert_eq!(
        error("def f(a, a):\n    pass\n").1,
        "duplicate argument 'a' in function definition"
    );
}

#[test]
fn keyword_ordering_in_calls() {
    assert_eq!(
        error("f(a=1, 2)\n").1,
        "positional argument follows keyword argument"
    );
}

#[test]
fn unexpected_token_reports_expectation() {
    let (line, message) = error("x = \n");
    assert_eq!(line, 1);
    assert_eq!(message, "invalid syntax: expected expression, found end of line");
}

#[test]
fn oversized_integer_literal() {
    assert_eq!(
        error("n = 99999999999999999999\n").1,
        "integer literal too large"
    );
}

#[test]
fn set_displays_are_rejected() {
    assert!(error("s = {1, 2}\n").1.contains("set displays"));
}

#[test]
fn display_includes_line() {
    let err = parse("x = (\n").unwrap_err();
    assert_eq!(err.to_string(), "'(' was never closed (line 1)");
}

#[test]
fn deeply_nested_expressions_are_rejected() {
    let source = format!("x = {}1{}\n", "(".repeat(500), ")".repeat(500));
    assert_eq!(error(&source).1, "expression is nested too deeply");
    let source = format!("x = {}1\n", "-".repeat(500));
    assert_eq!(error(&source).1, "expression is nested too deeply");
}

#[test]
fn moderate_nesting_is_fine() {
    let source = format!("x = {}1{}\n", "[".repeat(30), "]".repeat(30));
    assert!(parse(&source).is_ok());
}
