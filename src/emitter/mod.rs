//! MF3 document writer.
//!
//! Output is streamed, except for the plugin entry currently being built:
//! its tags and messages are held until the next entry starts so that each
//! entry carries a single `tag:` and a single `msg:` key.

mod entry;

pub use entry::{Deferred, MessageEntry, PendingEntry, TagEntry};

use crate::escape::escape_scalar;
use std::io::{self, Write};

const DOCUMENT_START: &str = "---";

/// Indent of a message item nested under a plugin's `msg:` key
const NESTED_ITEM: &str = "      ";
/// Indent of a top-level (global) item
const TOP_ITEM: &str = "  ";

pub struct Emitter<W: Write> {
    out: W,
    pending: Option<PendingEntry>,
    strip_comments: bool,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W, strip_comments: bool) -> Self {
        Self {
            out,
            pending: None,
            strip_comments,
        }
    }

    pub fn start_document(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", DOCUMENT_START)
    }

    /// Whether a plugin entry is open to receive tags and messages
    pub fn has_entry(&self) -> bool {
        self.pending.is_some()
    }

    /// Write `#text`, after the pending entry if there is one
    pub fn comment(&mut self, text: &str) -> io::Result<()> {
        if self.strip_comments {
            return Ok(());
        }
        match self.pending.as_mut() {
            Some(entry) => {
                entry.trailing.push(Deferred::Comment(text.to_string()));
                Ok(())
            }
            None => writeln!(self.out, "#{}", text),
        }
    }

    /// Close the current entry and open a new one
    pub fn begin_entry(&mut self, name: String) -> io::Result<()> {
        self.flush_entry()?;
        self.pending = Some(PendingEntry::new(name));
        Ok(())
    }

    /// Add a tag to the open entry. Callers check `has_entry` first.
    pub fn add_tag(&mut self, tag: TagEntry) {
        if let Some(entry) = self.pending.as_mut() {
            entry.tags.push(tag);
        }
    }

    /// Add a plugin-scoped message to the open entry
    pub fn add_message(&mut self, message: MessageEntry) {
        if let Some(entry) = self.pending.as_mut() {
            entry.messages.push(message);
        }
    }

    /// Write a top-level message, after the pending entry if there is one
    pub fn global_message(&mut self, message: MessageEntry) -> io::Result<()> {
        match self.pending.as_mut() {
            Some(entry) => {
                entry.trailing.push(Deferred::Global(message));
                Ok(())
            }
            None => write_message(&mut self.out, &message, TOP_ITEM),
        }
    }

    /// Flush the last entry and hand back the writer
    pub fn finish(mut self) -> io::Result<W> {
        self.flush_entry()?;
        self.out.flush()?;
        Ok(self.out)
    }

    fn flush_entry(&mut self) -> io::Result<()> {
        let Some(entry) = self.pending.take() else {
            return Ok(());
        };

        writeln!(self.out, "  - name: {}", escape_scalar(&entry.name))?;

        if !entry.tags.is_empty() {
            writeln!(self.out, "    tag:")?;
            for t in &entry.tags {
                match &t.condition {
                    None => writeln!(self.out, "      - {}", tag_scalar(&t.tag.name, t.tag.removed))?,
                    Some(cond) => {
                        writeln!(self.out, "      - condition: {}", escape_scalar(cond))?;
                        writeln!(self.out, "        name: {}", tag_scalar(&t.tag.name, t.tag.removed))?;
                    }
                }
            }
        }

        if !entry.messages.is_empty() {
            writeln!(self.out, "    msg:")?;
            for m in &entry.messages {
                write_message(&mut self.out, m, NESTED_ITEM)?;
            }
        }

        for item in &entry.trailing {
            match item {
                Deferred::Comment(text) => writeln!(self.out, "#{}", text)?,
                Deferred::Global(m) => write_message(&mut self.out, m, TOP_ITEM)?,
            }
        }

        Ok(())
    }
}

fn write_message<W: Write>(out: &mut W, message: &MessageEntry, indent: &str) -> io::Result<()> {
    writeln!(out, "{}- type: {}", indent, message.kind.as_str())?;
    if let Some(cond) = &message.condition {
        writeln!(out, "{}  condition: {}", indent, escape_scalar(cond))?;
    }
    writeln!(out, "{}  content: {}", indent, escape_scalar(&message.content))
}

/// Tag name scalar; removals keep a literal leading `-`
fn tag_scalar(name: &str, removed: bool) -> String {
    if !removed {
        return escape_scalar(name);
    }
    let plain = escape_scalar(name);
    if plain == name {
        format!("-{}", name)
    } else {
        escape_scalar(&format!("-{}", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{MessageKind, TagRef};

    fn render(f: impl FnOnce(&mut Emitter<Vec<u8>>)) -> String {
        let mut emitter = Emitter::new(Vec::new(), false);
        emitter.start_document().unwrap();
        f(&mut emitter);
        String::from_utf8(emitter.finish().unwrap()).unwrap()
    }

    fn say(content: &str, condition: Option<&str>) -> MessageEntry {
        MessageEntry {
            kind: MessageKind::Say,
            condition: condition.map(str::to_string),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_entry_with_tags_and_messages() {
        let out = render(|e| {
            e.begin_entry("Foo.esp".to_string()).unwrap();
            assert!(e.has_entry());
            e.add_tag(TagEntry {
                tag: TagRef { name: "Relev".to_string(), removed: true },
                condition: None,
            });
            e.add_tag(TagEntry {
                tag: TagRef { name: "Delev".to_string(), removed: false },
                condition: Some("file(\"a.esp\")".to_string()),
            });
            e.add_message(say("Hello", None));
        });

        assert_eq!(
            out,
            "---\n\
             \x20 - name: Foo.esp\n\
             \x20   tag:\n\
             \x20     - -Relev\n\
             \x20     - condition: 'file(\"a.esp\")'\n\
             \x20       name: Delev\n\
             \x20   msg:\n\
             \x20     - type: say\n\
             \x20       content: Hello\n"
        );
    }

    #[test]
    fn test_global_message_is_shallow() {
        let out = render(|e| {
            e.global_message(MessageEntry {
                kind: MessageKind::Error,
                condition: Some("a".to_string()),
                content: "Bad".to_string(),
            })
            .unwrap();
        });
        assert_eq!(out, "---\n  - type: error\n    condition: a\n    content: Bad\n");
    }

    #[test]
    fn test_comments_inside_entry_follow_it() {
        let out = render(|e| {
            e.comment(" header").unwrap();
            e.begin_entry("A.esp".to_string()).unwrap();
            e.comment(" note").unwrap();
            e.add_message(say("x", None));
        });
        assert_eq!(
            out,
            "---\n# header\n  - name: A.esp\n    msg:\n      - type: say\n        content: x\n# note\n"
        );
    }

    #[test]
    fn test_nothing_attaches_without_an_entry() {
        let out = render(|e| {
            assert!(!e.has_entry());
            e.add_message(say("x", None));
        });
        assert_eq!(out, "---\n");
    }

    #[test]
    fn test_strip_comments() {
        let mut e = Emitter::new(Vec::new(), true);
        e.start_document().unwrap();
        e.comment(" gone").unwrap();
        let out = String::from_utf8(e.finish().unwrap()).unwrap();
        assert_eq!(out, "---\n");
    }

    #[test]
    fn test_removed_tag_needing_quotes() {
        assert_eq!(tag_scalar("Relev", true), "-Relev");
        assert_eq!(tag_scalar("Actors.ACBS", false), "Actors.ACBS");
        assert_eq!(tag_scalar("Odd:Tag", true), "'-Odd:Tag'");
    }
}
