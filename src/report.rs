use crate::parser::MessageKind;
use serde::{Deserialize, Serialize};

/// Per-type message counts
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCounts {
    pub say: usize,
    pub warn: usize,
    pub error: usize,
}

impl MessageCounts {
    pub fn record(&mut self, kind: MessageKind) {
        match kind {
            MessageKind::Say => self.say += 1,
            MessageKind::Warn => self.warn += 1,
            MessageKind::Error => self.error += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.say + self.warn + self.error
    }
}

/// Statistics of one conversion run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    pub lines_read: usize,
    pub plugins: usize,
    pub regex_plugins: usize,
    /// Conditional `MOD:`/`REGEX:` lines written without their condition
    pub conditions_dropped: usize,
    pub tags_added: usize,
    pub tags_removed: usize,
    pub messages: MessageCounts,
    pub global_messages: usize,
    pub comments: usize,
    pub skipped_groups: usize,
    pub skipped_variables: usize,
    /// Unrecognized lines written out as comments
    pub passed_through: usize,
}

impl ConversionReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
