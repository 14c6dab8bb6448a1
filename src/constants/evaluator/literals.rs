//! Literal text parsing.
//!
//! Literal text arrives exactly as the lexer classified it (`0x1F`, `123L`, `1.5f`, `'\n'`). Every parser returns
//! `None` for malformed text and never panics.

use crate::constants::value::NativeValue;

/// Parse an integer literal: decimal, hexadecimal (`0x`) or binary (`0b`), with an optional long suffix (`L`).
///
/// ## Returns
/// - `Some((value, has_long_suffix))` when the text is a well-formed literal that fits in 64 bits.
/// - `None` otherwise.
pub fn parse_long(text: &str) -> Option<(i64, bool)> {
    let (body, long_suffix) = match text.strip_suffix(['L', 'l']) {
        Some(body) => (body, true),
        None => (text, false),
    };
    let (digits, radix) = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        (bin, 2)
    } else {
        (body, 10)
    };
    let digits = strip_separators(digits)?;
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let value = i64::from_str_radix(&digits, radix).ok()?;
    Some((value, long_suffix))
}

/// Parse a floating point literal. A trailing `f`/`F` selects `Float`; anything else is `Double`.
pub fn parse_floating(text: &str) -> Option<NativeValue> {
    let (body, is_float) = match text.strip_suffix(['f', 'F']) {
        Some(body) => (body, true),
        None => (text, false),
    };
    let body = strip_separators(body)?;
    // Reject spellings the standard parser accepts but the language does not (`inf`, `NaN`, `+1.0`).
    if !body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        || !body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    if is_float {
        body.parse::<f32>().ok().map(NativeValue::Float)
    } else {
        body.parse::<f64>().ok().map(NativeValue::Double)
    }
}

pub fn parse_boolean(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parse a character literal, quotes included (`'a'`, `'\n'`, `'A'`), into its UTF-16 code unit.
pub fn parse_char(text: &str) -> Option<u16> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    if let Some(escape) = inner.strip_prefix('\\') {
        return unescape(escape);
    }
    let mut chars = inner.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let mut units = [0u16; 2];
    match c.encode_utf16(&mut units) {
        [unit] => Some(*unit),
        _ => None,
    }
}

fn unescape(escape: &str) -> Option<u16> {
    let decoded = match escape {
        "t" => '\t',
        "b" => '\u{8}',
        "n" => '\n',
        "r" => '\r',
        "'" => '\'',
        "\"" => '"',
        "\\" => '\\',
        "$" => '$',
        _ => {
            let hex = escape.strip_prefix('u')?;
            if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            return u16::from_str_radix(hex, 16).ok();
        }
    };
    Some(decoded as u16)
}

/// Remove `_` digit separators; separators may only sit between digits.
fn strip_separators(text: &str) -> Option<String> {
    if text.is_empty() || text.starts_with('_') || text.ends_with('_') {
        return None;
    }
    Some(text.replace('_', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_radixes() {
        assert_eq!(parse_long("0x1F"), Some((31, false)));
        assert_eq!(parse_long("0b101"), Some((5, false)));
        assert_eq!(parse_long("123L"), Some((123, true)));
        assert_eq!(parse_long("1_000"), Some((1000, false)));
        assert_eq!(parse_long("0XffL"), Some((255, true)));
    }

    #[test]
    fn malformed_integers() {
        for text in ["", "L", "0x", "0x-1", "+5", "12a", "_1", "1_", "99999999999999999999", "0b102"] {
            assert_eq!(parse_long(text), None, "{text:?}");
        }
    }

    #[test]
    fn floating_literals() {
        assert_eq!(parse_floating("1.5f"), Some(NativeValue::Float(1.5)));
        assert_eq!(parse_floating("1.5"), Some(NativeValue::Double(1.5)));
        assert_eq!(parse_floating("1e10"), Some(NativeValue::Double(1e10)));
        assert_eq!(parse_floating(".5F"), Some(NativeValue::Float(0.5)));
        for text in ["inf", "NaN", "+1.0", "1.0.0", "", "f"] {
            assert_eq!(parse_floating(text), None, "{text:?}");
        }
    }

    #[test]
    fn character_literals() {
        assert_eq!(parse_char("'a'"), Some(97));
        assert_eq!(parse_char("'\\n'"), Some(10));
        assert_eq!(parse_char("'\\u0041'"), Some(65));
        assert_eq!(parse_char("'\\$'"), Some(36));
        for text in ["'ab'", "''", "'\\q'", "'\\u41'", "a", "'😀'", "'"] {
            assert_eq!(parse_char(text), None, "{text:?}");
        }
    }
}
