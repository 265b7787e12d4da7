#![allow(dead_code)]

use steptrace_tracer::{Driver, TraceConfig, TraceOutcome, TraceRequest, TraceStep};

/// Trace `source` with the default configuration.
pub fn trace(source: &str) -> TraceOutcome {
    run(TraceRequest::new(source))
}

pub fn run(request: TraceRequest) -> TraceOutcome {
    run_with(TraceConfig::default(), request)
}

pub fn run_with(config: TraceConfig, request: TraceRequest) -> TraceOutcome {
    match Driver::new(config).run(request) {
        Ok(outcome) => outcome,
        Err(err) => panic!("trace failed: {err}"),
    }
}

/// Line numbers of every step, in order.
pub fn lines(outcome: &TraceOutcome) -> Vec<i64> {
    outcome.steps.iter().map(|step| step.line_number).collect()
}

/// Compact JSON of one variable in `step`.
pub fn var(step: &TraceStep, name: &str) -> String {
    let value = step
        .variables
        .get(name)
        .unwrap_or_else(|| panic!("no variable '{name}' at line {}", step.line_number));
    serde_json::to_string(value).expect("snapshot serializes")
}

/// Variable names of `step`, in binding order.
pub fn names(step: &TraceStep) -> Vec<&str> {
    step.variables.keys().map(String::as_str).collect()
}
