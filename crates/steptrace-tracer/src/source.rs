//! Line lookup for the traced source.

#![allow(missing_docs)]

/// The traced source split into lines, with CRLF and CR normalized to LF.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    text: String,
    /// Byte ranges of each line within `text`, newline excluded.
    lines: Vec<(usize, usize)>,
}

impl SourceRegistry {
    #[must_use]
    pub fn new(source: &str) -> Self {
        let text = source.replace("\r\n", "\n").replace('\r', "\n");
        let mut lines = Vec::new();
        let mut start = 0;
        for (index, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                lines.push((start, index));
                start = index + 1;
            }
        }
        if start < text.len() {
            lines.push((start, text.len()));
        }
        Self { text, lines }
    }

    /// Normalized source text, as handed to the runtime.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Trimmed text of 1-based line `line`, or `None` when out of range.
    #[must_use]
    pub fn lookup(&self, line: usize) -> Option<&str> {
        let &(start, end) = self.lines.get(line.checked_sub(1)?)?;
        self.text.get(start..end).map(str::trim)
    }

    /// Step description for `line`: its trimmed text, or a generic
    /// placeholder when the line is unknown.
    #[must_use]
    pub fn describe(&self, line: usize) -> String {
        match self.lookup(line) {
            Some(text) => text.to_string(),
            None => format!("Executing line {line}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_trims_and_bounds() {
        let registry = SourceRegistry::new("x = 1\n    y = x  \n");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup(1), Some("x = 1"));
        assert_eq!(registry.lookup(2), Some("y = x"));
        assert_eq!(registry.lookup(0), None);
        assert_eq!(registry.lookup(3), None);
        assert_eq!(registry.describe(7), "Executing line 7");
    }

    #[test]
    fn line_endings_are_normalized() {
        let registry = SourceRegistry::new("a = 1\r\nb = 2\rc = 3");
        assert_eq!(registry.text(), "a = 1\nb = 2\nc = 3");
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.lookup(3), Some("c = 3"));
    }

    #[test]
    fn empty_source() {
        let registry = SourceRegistry::new("");
        assert!(registry.is_empty());
        assert_eq!(registry.lookup(1), None);
    }

    #[test]
    fn blank_lines_count() {
        let registry = SourceRegistry::new("\n\nz = 0\n");
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.lookup(1), Some(""));
        assert_eq!(registry.lookup(3), Some("z = 0"));
    }
}
