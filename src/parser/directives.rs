use super::types::{Directive, Guard, Marker, MessageKind, TagRef};
use crate::condition::Condition;
use crate::error::{ConvertError, Result};
use crate::escape::unwrap_quoted;

/// Position of a directive keyword inside a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerSpan {
    pub marker: Marker,
    /// Byte offset of the keyword
    pub start: usize,
    /// Byte offset just past the colon
    pub payload_start: usize,
}

/// Locate directive keywords outside double quotes.
///
/// A keyword only counts at the start of the line or after whitespace.
/// Scanning stops at the first message keyword since its payload is free
/// text that may itself contain colons.
pub fn find_markers(line: &str) -> Vec<MarkerSpan> {
    let mut spans = Vec::new();
    let mut in_quotes = false;
    let mut prev: Option<char> = None;

    for (i, ch) in line.char_indices() {
        if ch == '"' {
            in_quotes = !in_quotes;
        }

        let at_boundary = prev.map_or(true, char::is_whitespace);
        prev = Some(ch);
        if in_quotes || !at_boundary {
            continue;
        }

        let rest = &line[i..];
        if let Some(marker) = Marker::ALL.iter().find(|m| rest.starts_with(m.keyword())) {
            spans.push(MarkerSpan {
                marker: *marker,
                start: i,
                payload_start: i + marker.keyword().len(),
            });
            if marker.is_message() {
                break;
            }
        }
    }

    spans
}

/// Strip `kw` from the front of `text` when it is a whole word
fn strip_keyword<'a>(text: &'a str, kw: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(kw)?;
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => None,
        _ => Some(rest),
    }
}

/// Parse the text before the first directive.
///
/// Returns `None` when the prefix is not `[GLOBAL] [IF c | IFNOT c | ELSE][:]`.
pub fn parse_prefix(prefix: &str, line_no: usize) -> Result<Option<(bool, Option<Guard>)>> {
    let mut rest = prefix.trim();
    if let Some(stripped) = rest.strip_suffix(':') {
        rest = stripped.trim_end();
    }

    let global = match strip_keyword(rest, "GLOBAL") {
        Some(after) => {
            rest = after.trim_start();
            true
        }
        None => false,
    };

    if rest.is_empty() {
        return Ok(Some((global, None)));
    }

    let condition = |text: &str| {
        Condition::parse(text).map_err(|source| ConvertError::Condition {
            line: line_no,
            source,
        })
    };

    let guard = if let Some(text) = strip_keyword(rest, "IFNOT") {
        Guard::IfNot(condition(text)?)
    } else if let Some(text) = strip_keyword(rest, "IF") {
        Guard::If(condition(text)?)
    } else if let Some(text) = strip_keyword(rest, "ELSE") {
        if !text.trim().is_empty() {
            return Ok(None);
        }
        Guard::Else
    } else {
        return Ok(None);
    };

    Ok(Some((global, Some(guard))))
}

fn split_tags(list: &str, removed: bool, out: &mut Vec<TagRef>) {
    out.extend(
        list.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| TagRef {
                name: t.to_string(),
                removed,
            }),
    );
}

/// Extract tags from `{{BASH: A, B}}` (added) and `[C, D]` (removed) lists
pub fn parse_tag_lists(payload: &str, line_no: usize) -> Result<Vec<TagRef>> {
    const BASH_OPEN: &str = "{{BASH:";

    let mut tags = Vec::new();
    let mut rest = payload;

    loop {
        let bash = rest.find(BASH_OPEN);
        let bracket = rest.find('[');

        let (pos, is_bash) = match (bash, bracket) {
            (Some(b), Some(k)) if b < k => (b, true),
            (_, Some(k)) => (k, false),
            (Some(b), None) => (b, true),
            (None, None) => break,
        };

        if is_bash {
            let after = &rest[pos + BASH_OPEN.len()..];
            let end = after.find("}}").ok_or(ConvertError::UnterminatedTagList {
                line: line_no,
                expected: "}}",
            })?;
            split_tags(&after[..end], false, &mut tags);
            rest = &after[end + 2..];
        } else {
            let after = &rest[pos + 1..];
            let end = after.find(']').ok_or(ConvertError::UnterminatedTagList {
                line: line_no,
                expected: "]",
            })?;
            split_tags(&after[..end], true, &mut tags);
            rest = &after[end + 1..];
        }
    }

    Ok(tags)
}

/// Build the directive for one marker and its payload text
pub fn build_directive(marker: Marker, payload: &str, line_no: usize) -> Result<Directive> {
    let text = unwrap_quoted(payload).trim();

    let directive = match marker {
        Marker::Mod | Marker::Regex => {
            if text.is_empty() {
                return Err(ConvertError::EmptyPluginName { line: line_no });
            }
            Directive::Plugin {
                name: text.to_string(),
                regex: marker == Marker::Regex,
            }
        }
        Marker::Tag => Directive::Tags(parse_tag_lists(payload, line_no)?),
        Marker::Say => Directive::Message {
            kind: MessageKind::Say,
            content: text.to_string(),
        },
        Marker::Inc => Directive::Message {
            kind: MessageKind::Say,
            content: format!("Incompatible with {}", text),
        },
        Marker::Req => Directive::Message {
            kind: MessageKind::Say,
            content: format!("Requires {}", text),
        },
        Marker::Dirty | Marker::Warn => Directive::Message {
            kind: MessageKind::Warn,
            content: text.to_string(),
        },
        Marker::Error => Directive::Message {
            kind: MessageKind::Error,
            content: text.to_string(),
        },
    };

    Ok(directive)
}
