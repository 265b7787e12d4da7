#![no_main]

use libfuzzer_sys::fuzz_target;
use steptrace_tracer::{extract_trace, render_trace, Driver, TraceConfig, TraceRequest};

const MAX_SOURCE_BYTES: usize = 4096;
/// Constructs that can loop without bound (`for` over a list that grows
/// while it is iterated included); there is no step budget to stop them.
const UNBOUNDED: [&str; 5] = ["while", "range", "append", "extend", "insert"];

fuzz_target!(|data: &[u8]| {
    let capped = &data[..data.len().min(MAX_SOURCE_BYTES)];
    let source = String::from_utf8_lossy(capped);
    if UNBOUNDED.iter().any(|marker| source.contains(marker)) {
        return;
    }

    let config = TraceConfig {
        max_call_depth: 20,
        ..TraceConfig::default()
    };
    let Ok(outcome) = Driver::new(config).run(TraceRequest::new(source.as_ref())) else {
        return;
    };

    let faults = outcome.steps.iter().filter(|step| step.is_fault()).count();
    assert!(faults <= 1);
    if faults == 1 {
        assert!(outcome.steps.last().is_some_and(|step| step.is_fault()));
    }
    let rendered = render_trace(&outcome.steps).expect("trace renders");
    let extracted = extract_trace(&rendered).expect("payload parses");
    assert_eq!(extracted.len(), outcome.steps.len());
});
