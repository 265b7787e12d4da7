#![allow(dead_code)]

use steptrace_runtime::{
    Continuation, FrameView, Interpreter, RuntimeError, TraceEvent, TraceHook, Value,
};

/// Run `source` untraced and return the result with everything printed.
pub fn run(source: &str) -> (Result<(), RuntimeError>, String) {
    let mut interp = Interpreter::new();
    run_in(&mut interp, source)
}

pub fn run_in(interp: &mut Interpreter, source: &str) -> (Result<(), RuntimeError>, String) {
    let mut out = Vec::new();
    let result = interp
        .exec_source("<string>", source, &mut steptrace_runtime::NoopHook, &mut out)
        .map(|_| ());
    (result, String::from_utf8(out).expect("utf-8 output"))
}

/// Output of a run that must succeed.
pub fn output(source: &str) -> String {
    let (result, out) = run(source);
    if let Err(err) = result {
        panic!("run failed: {}", err.describe());
    }
    out
}

/// `"<Class>: <message>"` of a run that must fail.
pub fn fault(source: &str) -> String {
    let (result, _) = run(source);
    result.expect_err("run should fail").describe()
}

/// Evaluate a single expression and return its repr.
pub fn eval(expr: &str) -> String {
    let mut interp = Interpreter::new();
    let (result, _) = run_in(&mut interp, &format!("__result = {expr}\n"));
    if let Err(err) = result {
        panic!("{expr}: {}", err.describe());
    }
    interp.global("__result").map(Value::repr).unwrap_or_default()
}

/// Hook that renders every event it sees as a compact string.
#[derive(Default)]
pub struct EventLog {
    pub events: Vec<String>,
    /// Frames with these names are detached on `Call`.
    pub detach: Vec<&'static str>,
}

impl TraceHook for EventLog {
    fn on_event(&mut self, event: TraceEvent<'_>, frame: FrameView<'_>) -> Continuation {
        let name = frame.name();
        let entry = match event {
            TraceEvent::Call => format!("call {name}"),
            TraceEvent::Line => format!("line {name} {}", frame.line()),
            TraceEvent::Return(value) => format!("return {name} {}", value.repr()),
            TraceEvent::Exception(err) => format!("exception {name} {}", err.class_name()),
        };
        self.events.push(entry);
        if matches!(event, TraceEvent::Call) && self.detach.contains(&name) {
            Continuation::Detach
        } else {
            Continuation::Continue
        }
    }
}

/// Events produced by running `source` under an [`EventLog`].
pub fn events(source: &str) -> Vec<String> {
    events_with(source, EventLog::default())
}

pub fn events_with(source: &str, mut log: EventLog) -> Vec<String> {
    let mut interp = Interpreter::new();
    let mut out = Vec::new();
    let _ = interp.exec_source("<string>", source, &mut log, &mut out);
    log.events
}
