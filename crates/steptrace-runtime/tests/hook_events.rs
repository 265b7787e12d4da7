mod common;

use common::{events, events_with, EventLog};
use steptrace_runtime::{Continuation, FrameView, Interpreter, TraceEvent, TraceHook, Value};

#[test]
fn for_header_fires_before_every_fetch() {
    let source = "x = 1\nfor i in range(2):\n    x += i\nprint(x)\n";
    assert_eq!(
        events(source),
        vec![
            "call <module>",
            "line <module> 1",
            "line <module> 2",
            "line <module> 3",
            "line <module> 2",
            "line <module> 3",
            "line <module> 2",
            "line <module> 4",
            "return <module> None",
        ]
    );
}

#[test]
fn while_header_fires_before_every_test() {
    let source = "n = 2\nwhile n > 0:\n    n -= 1\n";
    assert_eq!(
        events(source),
        vec![
            "call <module>",
            "line <module> 1",
            "line <module> 2",
            "line <module> 3",
            "line <module> 2",
            "line <module> 3",
            "line <module> 2",
            "return <module> None",
        ]
    );
}

#[test]
fn each_elif_test_has_its_own_line() {
    let source = "x = 5\nif x < 0:\n    y = 1\nelif x < 10:\n    y = 2\nelse:\n    y = 3\n";
    let lines: Vec<String> = events(source)
        .into_iter()
        .filter(|event| event.starts_with("line"))
        .collect();
    assert_eq!(
        lines,
        vec![
            "line <module> 1",
            "line <module> 2",
            "line <module> 4",
            "line <module> 5"
        ]
    );
}

#[test]
fn function_calls_nest_their_events() {
    let source = "def add(a, b):\n    return a + b\n\ntotal = add(1, 2)\n";
    assert_eq!(
        events(source),
        vec![
            "call <module>",
            "line <module> 1",
            "line <module> 4",
            "call add",
            "line add 2",
            "return add 3",
            "return <module> None",
        ]
    );
}

#[test]
fn docstrings_produce_no_line_event() {
    let source = "def f():\n    \"\"\"Return one.\"\"\"\n    return 1\n\nf()\n";
    assert_eq!(
        events(source),
        vec![
            "call <module>",
            "line <module> 1",
            "line <module> 5",
            "call f",
            "line f 3",
            "return f 1",
            "return <module> None",
        ]
    );
}

#[test]
fn faults_unwind_with_exception_events() {
    let source = "def boom():\n    return 1 / 0\n\nboom()\n";
    assert_eq!(
        events(source),
        vec![
            "call <module>",
            "line <module> 1",
            "line <module> 4",
            "call boom",
            "line boom 2",
            "exception boom ZeroDivisionError",
            "exception <module> ZeroDivisionError",
        ]
    );
}

#[test]
fn detached_frames_go_quiet_but_callees_are_still_announced() {
    let source = "def helper():\n    x = 1\n    return x\n\ndef main():\n    return helper()\n\nmain()\n";
    let log = EventLog {
        detach: vec!["helper"],
        ..EventLog::default()
    };
    assert_eq!(
        events_with(source, log),
        vec![
            "call <module>",
            "line <module> 1",
            "line <module> 5",
            "line <module> 8",
            "call main",
            "line main 6",
            "call helper",
            "return main 1",
            "return <module> None",
        ]
    );

    let log = EventLog {
        detach: vec!["<module>"],
        ..EventLog::default()
    };
    assert_eq!(
        events_with("def f():\n    return 2\n\nf()\n", log),
        vec!["call <module>", "call f", "line f 2", "return f 2"]
    );
}

#[test]
fn syntax_errors_fire_nothing() {
    assert!(events("x = (\n").is_empty());
}

/// Records locals and the caller's name at every line event.
#[derive(Default)]
struct LocalsLog {
    seen: Vec<(u32, Vec<String>, Option<String>)>,
}

impl TraceHook for LocalsLog {
    fn on_event(&mut self, event: TraceEvent<'_>, frame: FrameView<'_>) -> Continuation {
        if matches!(event, TraceEvent::Line) {
            let locals = frame
                .locals()
                .map(|(name, value)| format!("{name}={}", value.repr()))
                .collect();
            let caller = frame.back().map(|back| back.name().to_string());
            self.seen.push((frame.line(), locals, caller));
        }
        Continuation::Continue
    }
}

#[test]
fn frame_views_expose_locals_and_parents() {
    let source = "def f(a):\n    b = a * 2\n    return b\n\nf(3)\n";
    let mut log = LocalsLog::default();
    let mut interp = Interpreter::new();
    let mut out = Vec::new();
    interp
        .exec_source("<string>", source, &mut log, &mut out)
        .unwrap();
    assert_eq!(
        log.seen,
        vec![
            (1, vec![], None),
            (5, vec!["f=<function f>".to_string()], None),
            (2, vec!["a=3".to_string()], Some("<module>".to_string())),
            (
                3,
                vec!["a=3".to_string(), "b=6".to_string()],
                Some("<module>".to_string())
            ),
        ]
    );
    assert!(interp.stack().is_empty());
    assert_eq!(interp.global("f").map(Value::type_name), Some("function"));
}

/// Caller chain, innermost first, at every line event of `inner`.
#[derive(Default)]
struct CallerChains {
    chains: Vec<Vec<String>>,
}

impl TraceHook for CallerChains {
    fn on_event(&mut self, event: TraceEvent<'_>, frame: FrameView<'_>) -> Continuation {
        if matches!(event, TraceEvent::Line) && frame.name() == "inner" {
            let mut chain = Vec::new();
            let mut current = frame.back();
            while let Some(view) = current {
                chain.push(format!("{}@{}", view.name(), view.line()));
                current = view.back();
            }
            self.chains.push(chain);
        }
        Continuation::Continue
    }
}

#[test]
fn back_walks_parent_links_to_the_module() {
    let source = "def inner():\n    return 1\ndef outer():\n    return inner()\nouter()\n";
    let mut chains = CallerChains::default();
    let mut interp = Interpreter::new();
    let mut out = Vec::new();
    interp
        .exec_source("<string>", source, &mut chains, &mut out)
        .unwrap();
    assert_eq!(
        chains.chains,
        vec![vec!["outer@4".to_string(), "<module>@5".to_string()]]
    );
}

#[test]
fn interpreter_call_runs_an_entry_point() {
    let mut interp = Interpreter::new();
    let mut out = Vec::new();
    let mut log = EventLog::default();
    interp
        .exec_source("<string>", "def double(n):\n    return n * 2\n", &mut log, &mut out)
        .unwrap();
    log.events.clear();
    let result = interp
        .call("double", vec![Value::Int(21)], &mut log, &mut out)
        .unwrap();
    assert_eq!(result.repr(), "42");
    assert_eq!(log.events, vec!["call double", "line double 2", "return double 42"]);
}
