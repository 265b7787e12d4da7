//! Marker-delimited payload emission and extraction.

#![allow(missing_docs)]

use std::io::Write;

use crate::error::TraceError;
use crate::recorder::TraceStep;

pub const TRACE_START: &str = "TRACE_START";
pub const TRACE_END: &str = "TRACE_END";

/// `TRACE_START`, the steps as one line of JSON, `TRACE_END`, each line
/// newline-terminated.
pub fn render_trace(steps: &[TraceStep]) -> Result<String, TraceError> {
    let json = serde_json::to_string(steps)?;
    Ok(format!("{TRACE_START}\n{json}\n{TRACE_END}\n"))
}

pub fn write_trace(writer: &mut impl Write, steps: &[TraceStep]) -> Result<(), TraceError> {
    writer.write_all(render_trace(steps)?.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Recover the steps from a stream that may carry other text around the
/// markers. The first `TRACE_START` line and the next `TRACE_END` line
/// after it delimit the payload.
pub fn extract_trace(text: &str) -> Result<Vec<TraceStep>, TraceError> {
    let mut lines = text.lines();
    if !lines.by_ref().any(|line| line.trim_end() == TRACE_START) {
        return Err(TraceError::Payload("missing TRACE_START marker".into()));
    }
    let mut payload = String::new();
    for line in lines {
        if line.trim_end() == TRACE_END {
            return Ok(serde_json::from_str(&payload)?);
        }
        payload.push_str(line);
        payload.push('\n');
    }
    Err(TraceError::Payload("missing TRACE_END marker".into()))
}
