use super::context::ConverterContext;
use crate::emitter::{Emitter, MessageEntry, TagEntry};
use crate::error::Result;
use crate::parser::{classify_line, DataLine, Directive, LineKind};
use crate::report::ConversionReport;
use std::borrow::Cow;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

/// Convert a legacy masterlist read from `reader` into MF3 text on `writer`.
///
/// Stops at the first malformed line. On error, `writer` may hold a
/// partial document. Bytes that are not UTF-8 are replaced and logged
/// with their line number.
pub fn run_converter<R: BufRead, W: Write>(
    mut reader: R,
    writer: W,
    strip_comments: bool,
) -> Result<ConversionReport> {
    let mut ctx = ConverterContext::new();
    let mut emitter = Emitter::new(writer, strip_comments);
    let mut report = ConversionReport::default();

    emitter.start_document()?;

    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;
        report.lines_read += 1;
        let line = decode_line(&buf, line_no);

        let kind = classify_line(&line, line_no, ctx.in_block_comment())?;
        debug!(line = line_no, ?kind, "classified");

        match kind {
            LineKind::Blank => {}
            LineKind::LineComment(text) => {
                report.comments += 1;
                emitter.comment(&text)?;
            }
            LineKind::BlockCommentOpen => {
                ctx.open_block_comment(line_no);
                report.comments += 1;
                emitter.comment(&line)?;
            }
            LineKind::BlockCommentClose => {
                ctx.close_block_comment();
                report.comments += 1;
                emitter.comment(&line)?;
            }
            LineKind::BlockCommentInline | LineKind::BlockCommentBody => {
                report.comments += 1;
                emitter.comment(&line)?;
            }
            LineKind::GroupMarker => report.skipped_groups += 1,
            LineKind::VariableSet => report.skipped_variables += 1,
            LineKind::PluginName(name) => {
                report.plugins += 1;
                emitter.begin_entry(name)?;
            }
            LineKind::Data(data) => {
                process_data_line(&mut ctx, &mut emitter, &mut report, data, &line, line_no)?;
            }
            LineKind::Unknown => {
                warn!(line = line_no, "unrecognized line kept as a comment: {}", line.trim());
                report.passed_through += 1;
                emitter.comment(&line)?;
            }
        }
    }

    ctx.finish()?;
    emitter.finish()?;

    info!(
        lines = report.lines_read,
        plugins = report.plugins,
        messages = report.messages.total() + report.global_messages,
        "conversion finished"
    );

    Ok(report)
}

/// Strip the line ending and decode, replacing bytes that are not UTF-8
fn decode_line(buf: &[u8], line_no: usize) -> String {
    let mut bytes = buf.strip_suffix(b"\n").unwrap_or(buf);
    bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);

    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => {
            warn!(line = line_no, "line is not valid UTF-8, bad bytes replaced");
            text
        }
    }
}

/// Keep a tag or plugin message with no entry to attach to as a comment
fn pass_through_orphan<W: Write>(
    emitter: &mut Emitter<W>,
    report: &mut ConversionReport,
    line: &str,
    line_no: usize,
    directive: &str,
) -> Result<()> {
    warn!(
        line = line_no,
        "{} directive before any plugin entry kept as a comment: {}",
        directive,
        line.trim()
    );
    report.passed_through += 1;
    emitter.comment(line)?;
    Ok(())
}

fn process_data_line<W: Write>(
    ctx: &mut ConverterContext,
    emitter: &mut Emitter<W>,
    report: &mut ConversionReport,
    data: DataLine,
    line: &str,
    line_no: usize,
) -> Result<()> {
    let condition = ctx
        .resolve_guard(data.guard, line_no)?
        .map(|c| c.to_string());

    for directive in data.directives {
        match directive {
            Directive::Plugin { name, regex } => {
                if let Some(cond) = &condition {
                    warn!(
                        line = line_no,
                        "condition '{}' on plugin {} dropped, entry is unconditional", cond, name
                    );
                    report.conditions_dropped += 1;
                }
                report.plugins += 1;
                if regex {
                    report.regex_plugins += 1;
                }
                emitter.begin_entry(name)?;
            }
            Directive::Tags(tags) => {
                if !emitter.has_entry() {
                    return pass_through_orphan(emitter, report, line, line_no, "TAG");
                }
                if tags.is_empty() {
                    warn!(line = line_no, "TAG directive without any tag list");
                }
                for tag in tags {
                    if tag.removed {
                        report.tags_removed += 1;
                    } else {
                        report.tags_added += 1;
                    }
                    emitter.add_tag(TagEntry {
                        tag,
                        condition: condition.clone(),
                    });
                }
            }
            Directive::Message { kind, content } => {
                let message = MessageEntry {
                    kind,
                    condition: condition.clone(),
                    content,
                };
                if data.global {
                    report.global_messages += 1;
                    emitter.global_message(message)?;
                } else {
                    if !emitter.has_entry() {
                        return pass_through_orphan(emitter, report, line, line_no, kind.as_str());
                    }
                    report.messages.record(kind);
                    emitter.add_message(message);
                }
            }
        }
    }

    Ok(())
}
