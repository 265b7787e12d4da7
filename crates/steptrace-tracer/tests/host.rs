mod common;

use common::{lines, names, run, run_with, var};
use steptrace_tracer::{Driver, DriverState, TraceConfig, TraceError, TraceRequest};

const PRELUDE: &str = "\
def emit(x):
    print(x)
    return x

def apply(f, x):
    return f(x)

LIMIT = 3
";

#[test]
fn prelude_frames_are_not_traced() {
    let request = TraceRequest::new("y = emit(LIMIT)\nz = y + 1\n").with_prelude(PRELUDE);
    let outcome = run(request);
    assert_eq!(lines(&outcome), vec![1, 2]);
    assert_eq!(names(&outcome.steps[1]), vec!["y"]);
    assert_eq!(outcome.steps[1].output.as_deref(), Some("3\n"));
}

#[test]
fn traced_functions_called_from_prelude_are_traced() {
    let source = "\
def double(n):
    return n * 2
r = apply(double, 5)
";
    let outcome = run(TraceRequest::new(source).with_prelude(PRELUDE));
    assert_eq!(lines(&outcome), vec![1, 3, 2]);
    assert_eq!(outcome.steps[2].call_stack, vec!["double()"]);
    assert_eq!(var(&outcome.steps[2], "n"), "5");
}

#[test]
fn prelude_output_is_dropped() {
    let request = TraceRequest::new("x = 1\n").with_prelude("print('setup')\n");
    let outcome = run(request);
    assert_eq!(outcome.stdout, "");
    assert_eq!(outcome.steps[0].output.as_deref(), Some(""));
}

#[test]
fn prelude_claiming_traced_source_fails_install() {
    let request = TraceRequest::new("x = 1\n").with_named_prelude("<string>", "helper = 1\n");
    let mut driver = Driver::new(TraceConfig::default());
    let err = driver.run(request).unwrap_err();
    assert!(matches!(err, TraceError::HookInstall(ref name) if name == "<string>"));
    assert_eq!(
        err.to_string(),
        "cannot install trace hook: source '<string>' is already loaded"
    );
    assert_eq!(driver.state(), DriverState::Idle);
}

#[test]
fn failing_prelude_is_fatal() {
    let request = TraceRequest::new("x = 1\n").with_prelude("oops = 1 / 0\n");
    let err = Driver::new(TraceConfig::default()).run(request).unwrap_err();
    assert_eq!(
        err.to_string(),
        "host prelude failed: ZeroDivisionError: division by zero"
    );
}

#[test]
fn configured_limits_apply() {
    let config = TraceConfig {
        source_name: "main.py".into(),
        max_call_stack: 2,
        excluded_names: vec!["secret".into()],
        ..TraceConfig::default()
    };
    let source = "\
secret = 42
def a():
    return b()
def b():
    return c()
def c():
    return secret
a()
";
    let outcome = run_with(config, TraceRequest::new(source));
    let in_c = outcome.steps.iter().find(|step| step.line_number == 7).unwrap();
    assert_eq!(in_c.call_stack, vec!["b()", "c()"]);
    assert!(outcome.steps.iter().all(|step| !step.variables.contains_key("secret")));
}

#[test]
fn recursion_limit_becomes_fault_step() {
    let config = TraceConfig {
        max_call_depth: 20,
        ..TraceConfig::default()
    };
    let source = "\
def forever(n):
    return forever(n + 1)
forever(0)
";
    let outcome = run_with(config, TraceRequest::new(source));
    let fault = outcome.steps.last().unwrap();
    assert!(fault.is_fault());
    assert_eq!(fault.description, "RecursionError: maximum recursion depth exceeded");
    assert_eq!(outcome.steps.iter().filter(|step| step.is_fault()).count(), 1);
}

#[test]
fn deep_recursion_runs_off_the_callers_stack() {
    let config = TraceConfig {
        max_call_depth: 1000,
        max_call_stack: 3,
        ..TraceConfig::default()
    };
    let source = "\
def f(n):
    if n == 0:
        return 0
    return 1 + f(n - 1)
result = f(900)
";
    let outcome = run_with(config, TraceRequest::new(source));
    assert!(!outcome.is_faulted());
    let base_case = outcome.steps.iter().rev().find(|step| step.line_number == 3).unwrap();
    assert_eq!(var(base_case, "n"), "0");
    assert_eq!(base_case.call_stack, vec!["f()", "f()", "f()"]);
}

#[test]
fn missing_entry_point_is_a_fault() {
    let request = TraceRequest::new("x = 1\n").with_entry("main", Vec::new());
    let outcome = run(request);
    assert_eq!(lines(&outcome), vec![1, -1]);
    assert_eq!(
        outcome.steps[1].description,
        "NameError: name 'main' is not defined"
    );
}
