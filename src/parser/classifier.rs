use super::directives::{build_directive, find_markers, parse_prefix};
use super::types::{DataLine, LineKind};
use crate::error::{ConvertError, Result};
use crate::escape::unwrap_quoted;

const LINE_COMMENT: &str = "//";
const BLOCK_OPEN: &str = "/*";
const BLOCK_CLOSE: &str = "*/";

/// Check if line is a group or variable construct with no MF3 equivalent
pub fn is_skipped_construct(line: &str) -> Option<LineKind> {
    if line.contains("BEGINGROUP:") || line.contains("ENDGROUP:") {
        Some(LineKind::GroupMarker)
    } else if line.contains("SET:") {
        Some(LineKind::VariableSet)
    } else {
        None
    }
}

/// Classify one line. Rules are tried in order and the first match wins.
///
/// `in_block` is whether a block comment was open before this line.
pub fn classify_line(line: &str, line_no: usize, in_block: bool) -> Result<LineKind> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Ok(LineKind::Blank);
    }

    if let Some(text) = trimmed.strip_prefix(LINE_COMMENT) {
        return Ok(LineKind::LineComment(text.to_string()));
    }

    if let Some(open) = line.find(BLOCK_OPEN) {
        let closes_here = line
            .rfind(BLOCK_CLOSE)
            .is_some_and(|close| close >= open + BLOCK_OPEN.len());
        return Ok(if closes_here {
            LineKind::BlockCommentInline
        } else {
            LineKind::BlockCommentOpen
        });
    }

    if line.contains(BLOCK_CLOSE) {
        if !in_block {
            return Err(ConvertError::UnbalancedCommentClose { line: line_no });
        }
        return Ok(LineKind::BlockCommentClose);
    }

    if in_block {
        return Ok(LineKind::BlockCommentBody);
    }

    if let Some(kind) = is_skipped_construct(line) {
        return Ok(kind);
    }

    classify_data_line(line, line_no)
}

fn classify_data_line(line: &str, line_no: usize) -> Result<LineKind> {
    let spans = find_markers(line);

    if spans.is_empty() {
        if line.contains(':') {
            return Ok(LineKind::Unknown);
        }
        return Ok(LineKind::PluginName(unwrap_quoted(line).to_string()));
    }

    let Some((global, guard)) = parse_prefix(&line[..spans[0].start], line_no)? else {
        return Ok(LineKind::Unknown);
    };

    let mut directives = Vec::with_capacity(spans.len());
    for (i, span) in spans.iter().enumerate() {
        let end = spans.get(i + 1).map_or(line.len(), |next| next.start);
        directives.push(build_directive(
            span.marker,
            &line[span.payload_start..end],
            line_no,
        )?);
    }

    Ok(LineKind::Data(DataLine {
        global,
        guard,
        directives,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::types::{Directive, Guard, MessageKind};

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(classify_line("   ", 1, false).unwrap(), LineKind::Blank);
        assert_eq!(
            classify_line("// Section", 1, false).unwrap(),
            LineKind::LineComment(" Section".to_string())
        );
    }

    #[test]
    fn test_block_comment_states() {
        assert_eq!(classify_line("/* start", 1, false).unwrap(), LineKind::BlockCommentOpen);
        assert_eq!(
            classify_line("/* one line */", 1, false).unwrap(),
            LineKind::BlockCommentInline
        );
        assert_eq!(classify_line("MOD: Foo.esp", 2, true).unwrap(), LineKind::BlockCommentBody);
        assert_eq!(classify_line("end */", 3, true).unwrap(), LineKind::BlockCommentClose);
        assert!(matches!(
            classify_line("end */", 4, false),
            Err(ConvertError::UnbalancedCommentClose { line: 4 })
        ));
    }

    #[test]
    fn test_group_and_set_lines_skipped() {
        assert_eq!(
            classify_line("BEGINGROUP: Core", 1, false).unwrap(),
            LineKind::GroupMarker
        );
        assert_eq!(
            classify_line("ENDGROUP: Core", 1, false).unwrap(),
            LineKind::GroupMarker
        );
        assert_eq!(
            classify_line("IF FILE(\"a.esp\") SET: $A", 1, false).unwrap(),
            LineKind::VariableSet
        );
    }

    #[test]
    fn test_bare_plugin_name() {
        assert_eq!(
            classify_line("  Oscuro's Oblivion Overhaul.esm ", 1, false).unwrap(),
            LineKind::PluginName("Oscuro's Oblivion Overhaul.esm".to_string())
        );
    }

    #[test]
    fn test_unknown_forms() {
        assert_eq!(classify_line("Foo: bar", 1, false).unwrap(), LineKind::Unknown);
        assert_eq!(
            classify_line("whatever SAY: hi", 1, false).unwrap(),
            LineKind::Unknown
        );
    }

    #[test]
    fn test_data_line_with_guard() {
        let kind = classify_line(r#"IFNOT FILE("Bar.esp") WARN: Needs Bar"#, 1, false).unwrap();
        let LineKind::Data(data) = kind else {
            panic!("expected data line");
        };
        assert!(!data.global);
        assert!(matches!(data.guard, Some(Guard::IfNot(_))));
        assert_eq!(
            data.directives,
            vec![Directive::Message {
                kind: MessageKind::Warn,
                content: "Needs Bar".to_string()
            }]
        );
    }

    #[test]
    fn test_coexisting_directives() {
        let kind = classify_line("MOD: Foo.esp TAG: [Delev]", 1, false).unwrap();
        let LineKind::Data(data) = kind else {
            panic!("expected data line");
        };
        assert_eq!(data.directives.len(), 2);
        assert_eq!(
            data.directives[0],
            Directive::Plugin {
                name: "Foo.esp".to_string(),
                regex: false
            }
        );
    }
}
