mod common;

use common::{run, trace};
use expect_test::expect;
use serde_json::json;
use steptrace_tracer::{extract_trace, render_trace, TraceRequest};

#[test]
fn loop_payload() {
    let outcome = trace("total = 0\nfor n in [1, 2]:\n    total += n\nprint(total)\n");
    expect![[r#"
        TRACE_START
        [{"lineNumber":1,"variables":{},"callStack":[],"description":"total = 0"},{"lineNumber":2,"variables":{"total":0},"callStack":[],"description":"for n in [1, 2]:"},{"lineNumber":3,"variables":{"total":0,"n":1},"callStack":[],"description":"total += n"},{"lineNumber":2,"variables":{"total":1,"n":1},"callStack":[],"description":"for n in [1, 2]:"},{"lineNumber":3,"variables":{"total":1,"n":2},"callStack":[],"description":"total += n"},{"lineNumber":2,"variables":{"total":3,"n":2},"callStack":[],"description":"for n in [1, 2]:"},{"lineNumber":4,"variables":{"total":3,"n":2},"callStack":[],"description":"print(total)","output":"3\n"}]
        TRACE_END
    "#]]
    .assert_eq(&render_trace(&outcome.steps).unwrap());
}

#[test]
fn fault_payload() {
    let outcome = trace("x = 1\ny = x // 0\n");
    expect![[r#"
        TRACE_START
        [{"lineNumber":1,"variables":{},"callStack":[],"description":"x = 1"},{"lineNumber":2,"variables":{"x":1},"callStack":[],"description":"y = x // 0"},{"lineNumber":-1,"variables":{},"callStack":[],"description":"ZeroDivisionError: integer division or modulo by zero","output":"ZeroDivisionError: integer division or modulo by zero"}]
        TRACE_END
    "#]]
    .assert_eq(&render_trace(&outcome.steps).unwrap());
}

#[test]
fn payload_round_trips_through_extraction() {
    let source = "\
def stats(xs):
    ratio = sum(xs) / len(xs)
    tags = {1: 'one', 'two': [2.5, None, True]}
    return ratio

stats([1, 2])
";
    let outcome = run(
        TraceRequest::new(source).with_entry("stats", vec![json!([3])]),
    );
    assert_eq!(outcome.return_value.as_deref(), Some("3.0"));
    let stream = format!(
        "launching\n{}\nexited with 0\n",
        render_trace(&outcome.steps).unwrap()
    );
    assert_eq!(extract_trace(&stream).unwrap(), outcome.steps);
}

#[test]
fn payload_is_one_json_line() {
    let outcome = trace("s = 'a\\nb'\nprint(s)\n");
    let rendered = render_trace(&outcome.steps).unwrap();
    let body: Vec<&str> = rendered.lines().collect();
    assert_eq!(body.len(), 3);
    assert_eq!(body[0], "TRACE_START");
    assert_eq!(body[2], "TRACE_END");
    assert_eq!(outcome.steps[1].output.as_deref(), Some("a\nb\n"));
}
