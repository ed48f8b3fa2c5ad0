//! Literal token decoding.

/// Why a literal could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    #[error("unrecognized escape sequence `{0}`")]
    InvalidEscape(String),
    #[error("empty character literal")]
    EmptyChar,
    #[error("too many characters in character literal")]
    TooManyChars,
}

/// Decimal or hex integer with optional `_` separators and `L`/`U` suffixes.
/// `None` when the value does not fit in 64 bits.
pub fn parse_int(text: &str) -> Option<u64> {
    let digits: String = text
        .trim_end_matches(['l', 'L', 'u', 'U'])
        .chars()
        .filter(|c| *c != '_')
        .collect();
    match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => digits.parse().ok(),
    }
}

/// Real literal with optional `_` separators and `f`/`d`/`m` suffix.
pub fn parse_real(text: &str) -> Option<f64> {
    let digits: String = text
        .trim_end_matches(['f', 'F', 'd', 'D', 'm', 'M'])
        .chars()
        .filter(|c| *c != '_')
        .collect();
    digits.parse().ok()
}

/// Body of a regular `"..."` literal, quotes included.
pub fn unescape_string(text: &str) -> Result<String, LiteralError> {
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    unescape(inner)
}

/// Body of a verbatim `@"..."` literal: only `""` is special.
pub fn unescape_verbatim(text: &str) -> String {
    let inner = text
        .strip_prefix("@\"")
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    inner.replace("\"\"", "\"")
}

/// Body of a `'c'` literal, quotes included.
pub fn unescape_char(text: &str) -> Result<char, LiteralError> {
    let inner = text
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .unwrap_or(text);
    let decoded = unescape(inner)?;
    let mut chars = decoded.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Err(LiteralError::EmptyChar),
        (Some(c), None) => Ok(c),
        (Some(_), Some(_)) => Err(LiteralError::TooManyChars),
    }
}

fn unescape(inner: &str) -> Result<String, LiteralError> {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            return Err(LiteralError::InvalidEscape("\\".to_string()));
        };
        let decoded = match escape {
            '\'' => '\'',
            '"' => '"',
            '\\' => '\\',
            '0' => '\0',
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{b}',
            'u' | 'U' | 'x' => {
                let (min, max) = match escape {
                    'u' => (4, 4),
                    'U' => (8, 8),
                    _ => (1, 4),
                };
                let mut hex = String::new();
                while hex.len() < max && chars.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    hex.extend(chars.next());
                }
                let code = (hex.len() >= min)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match code {
                    Some(c) => c,
                    None => return Err(LiteralError::InvalidEscape(format!("\\{escape}{hex}"))),
                }
            }
            other => return Err(LiteralError::InvalidEscape(format!("\\{other}"))),
        };
        out.push(decoded);
    }

    Ok(out)
}
