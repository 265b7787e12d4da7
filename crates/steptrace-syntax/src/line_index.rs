//! Byte offset to line number mapping.

use text_size::TextSize;

/// Maps byte offsets to 1-based line numbers.
///
/// `\n`, `\r\n`, and a lone `\r` all terminate a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    /// Builds the index for `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![TextSize::from(0)];
        for (i, byte) in bytes.iter().enumerate() {
            let ends_line = match byte {
                b'\n' => true,
                b'\r' => bytes.get(i + 1) != Some(&b'\n'),
                _ => false,
            };
            if ends_line {
                line_starts.push(TextSize::from((i + 1) as u32));
            }
        }
        Self { line_starts }
    }

    /// Returns the 1-based line containing `offset`.
    #[must_use]
    pub fn line(&self, offset: TextSize) -> u32 {
        self.line_starts.partition_point(|start| *start <= offset) as u32
    }

    /// Returns the offset of the first byte of the line containing `offset`.
    #[must_use]
    pub fn line_start(&self, offset: TextSize) -> TextSize {
        let line = self.line(offset).max(1) as usize;
        self.line_starts[line - 1]
    }

    /// Number of lines in the text (a trailing newline opens an empty last line).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
