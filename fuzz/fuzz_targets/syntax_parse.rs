#![no_main]

use libfuzzer_sys::fuzz_target;

const MAX_SOURCE_BYTES: usize = 8192;

fuzz_target!(|data: &[u8]| {
    let capped = &data[..data.len().min(MAX_SOURCE_BYTES)];
    let source = String::from_utf8_lossy(capped);
    let _ = steptrace_syntax::parse(&source);
});
