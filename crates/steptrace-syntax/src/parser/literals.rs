//! Literal decoding.

/// Decode an integer literal (`1_000`, `0xff`). `None` on overflow.
pub(crate) fn parse_int(text: &str) -> Option<i64> {
    let cleaned: String = text.chars().filter(|ch| *ch != '_').collect();
    match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok(),
        None => cleaned.parse().ok(),
    }
}

/// Decode a float literal (`1.5`, `.5`, `2.`, `1e-3`).
pub(crate) fn parse_float(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|ch| *ch != '_').collect();
    cleaned.parse().ok()
}

/// Strip the quotes from a string literal token and process escapes.
///
/// Unknown escapes are kept verbatim, backslash included.
pub(crate) fn unescape_string(raw: &str) -> String {
    let quote_len = if raw.starts_with("\"\"\"") || raw.starts_with("'''") {
        3
    } else {
        1
    };
    let body = raw
        .get(quote_len..raw.len().saturating_sub(quote_len))
        .unwrap_or_default();

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0C'),
            'v' => out.push('\x0B'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            'x' => {
                let hex: String = chars.clone().take(2).collect();
                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) if hex.len() == 2 => {
                        out.push(char::from(byte));
                        chars.next();
                        chars.next();
                    }
                    _ => out.push_str("\\x"),
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("1_000"), Some(1000));
        assert_eq!(parse_int("0xff"), Some(255));
        assert_eq!(parse_int("99999999999999999999"), None);
    }

    #[test]
    fn floats() {
        assert_eq!(parse_float("1.5"), Some(1.5));
        assert_eq!(parse_float(".5"), Some(0.5));
        assert_eq!(parse_float("2."), Some(2.0));
        assert_eq!(parse_float("1e-3"), Some(0.001));
    }

    #[test]
    fn escapes() {
        assert_eq!(unescape_string(r"'a\nb'"), "a\nb");
        assert_eq!(unescape_string(r#""say \"hi\"""#), "say \"hi\"");
        assert_eq!(unescape_string(r"'\x41\d'"), "A\\d");
        assert_eq!(unescape_string("'''two\nlines'''"), "two\nlines");
        assert_eq!(unescape_string("''"), "");
    }
}
