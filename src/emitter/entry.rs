use crate::parser::{MessageKind, TagRef};

/// A tag as it will be written under `tag:`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub tag: TagRef,
    /// Rendered MF3 condition, not yet escaped
    pub condition: Option<String>,
}

/// A message as it will be written under `msg:` or at top level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    pub kind: MessageKind,
    pub condition: Option<String>,
    pub content: String,
}

/// Output that must wait until the pending plugin entry is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    Comment(String),
    Global(MessageEntry),
}

/// Plugin entry still collecting tags and messages
#[derive(Debug, Clone, Default)]
pub struct PendingEntry {
    pub name: String,
    pub tags: Vec<TagEntry>,
    pub messages: Vec<MessageEntry>,
    pub trailing: Vec<Deferred>,
}

impl PendingEntry {
    pub fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }
}
