//! In-memory sink for the traced unit's output.

#![allow(missing_docs)]

use std::io::{self, Write};

use tracing::warn;

/// Buffer handed to the runtime as its output sink.
///
/// Only writes made while the capture is active are kept; anything else
/// (host prelude output) is dropped.
#[derive(Debug, Default)]
pub struct OutputCapture {
    buffer: Vec<u8>,
    active: bool,
    dropped: usize,
}

impl OutputCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Bytes discarded while inactive.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Captured text so far.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer).into_owned()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        match String::from_utf8(self.buffer) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }
}

impl Write for OutputCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.active {
            self.buffer.extend_from_slice(buf);
        } else {
            warn!(bytes = buf.len(), "dropping output written outside the traced unit");
            self.dropped += buf.len();
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
