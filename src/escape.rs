//! Minimal scalar quoting for the MF3 output document

/// Characters that force quoting of a scalar
const SPECIAL_CHARS: &[char] = &[
    '-', '?', ':', ',', '[', ']', '{', '}', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`',
    '#',
];

/// Plain words a YAML resolver reads as booleans or null
const NON_STRING_WORDS: &[&str] = &[
    "~", "null", "true", "false", "yes", "no", "on", "off", "y", "n",
];

/// Whether a plain scalar would load as a bool, null or number
fn resolves_to_non_string(text: &str) -> bool {
    if NON_STRING_WORDS.iter().any(|w| text.eq_ignore_ascii_case(w)) {
        return true;
    }

    let unsigned = text.strip_prefix('+').unwrap_or(text);
    if let Some(digits) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0o"))
    {
        return !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit());
    }

    let numeric_shape = unsigned.chars().any(|c| c.is_ascii_digit())
        && unsigned
            .chars()
            .all(|c| c.is_ascii_digit() || c == '_' || c == '.');

    numeric_shape
        || unsigned.parse::<f64>().is_ok()
        || matches!(
            unsigned.to_ascii_lowercase().as_str(),
            ".inf" | ".nan"
        )
}

/// Quote `text` so it reads back as the same string.
///
/// Text with a single quote is double-quoted with `\` and `"` escaped.
/// Text with any other special character, or text that would otherwise
/// load as a bool, null or number, is single-quoted. Anything else is
/// written as a plain scalar.
pub fn escape_scalar(text: &str) -> String {
    if text.is_empty() {
        return "''".to_string();
    }

    if text.contains('\'') {
        let mut out = String::with_capacity(text.len() + 2);
        out.push('"');
        for ch in text.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                _ => out.push(ch),
            }
        }
        out.push('"');
        return out;
    }

    if text.contains(SPECIAL_CHARS) || resolves_to_non_string(text) {
        return format!("'{}'", text);
    }

    text.to_string()
}

/// Strip one enclosing pair of double quotes, if present
pub fn unwrap_quoted(text: &str) -> &str {
    let t = text.trim();
    if t.len() >= 2 && t.starts_with('"') && t.ends_with('"') {
        &t[1..t.len() - 1]
    } else {
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_unquoted() {
        assert_eq!(escape_scalar("Foo.esp"), "Foo.esp");
        assert_eq!(escape_scalar("Unofficial Oblivion Patch.esp"), "Unofficial Oblivion Patch.esp");
    }

    #[test]
    fn test_special_chars_single_quoted() {
        assert_eq!(escape_scalar("Note: clean"), "'Note: clean'");
        assert_eq!(escape_scalar("file(\"a.esp\")"), "'file(\"a.esp\")'");
        assert_eq!(escape_scalar("see #3"), "'see #3'");
    }

    #[test]
    fn test_single_quote_double_quoted() {
        assert_eq!(escape_scalar("Oscuro's"), "\"Oscuro's\"");
        assert_eq!(
            escape_scalar(r#"it's "a" \path"#),
            r#""it's \"a\" \\path""#
        );
    }

    #[test]
    fn test_non_string_plain_scalars_quoted() {
        for text in ["true", "False", "null", "~", "yes", "1", "1.0", "+2", "1e5", "0x1F", ".inf"] {
            assert_eq!(escape_scalar(text), format!("'{}'", text), "{}", text);
        }
        assert_eq!(escape_scalar("1.0.2"), "'1.0.2'");
        assert_eq!(escape_scalar("v1.0"), "v1.0");
        assert_eq!(escape_scalar("Trueblood.esp"), "Trueblood.esp");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(escape_scalar(""), "''");
    }

    #[test]
    fn test_unwrap_quoted() {
        assert_eq!(unwrap_quoted("\"Hello\""), "Hello");
        assert_eq!(unwrap_quoted("  \"Hi there\" "), "Hi there");
        assert_eq!(unwrap_quoted("\"open"), "\"open");
        assert_eq!(unwrap_quoted("\""), "\"");
    }
}
