use crate::condition::Condition;

/// Category of one physical masterlist line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    Blank,
    /// `// text`, payload is the text after the marker
    LineComment(String),
    /// `/* ...` that stays open past this line
    BlockCommentOpen,
    /// `/* ... */` on a single line
    BlockCommentInline,
    /// `... */`
    BlockCommentClose,
    /// Any line between an open and a close
    BlockCommentBody,
    /// `BEGINGROUP:` / `ENDGROUP:`
    GroupMarker,
    /// `SET:` variable definitions
    VariableSet,
    /// Bare line with no directive marker
    PluginName(String),
    Data(DataLine),
    /// Has a `:` but no recognizable directive or prefix
    Unknown,
}

/// A line carrying one or more directives plus an optional guard
#[derive(Debug, Clone, PartialEq)]
pub struct DataLine {
    pub global: bool,
    pub guard: Option<Guard>,
    pub directives: Vec<Directive>,
}

/// Conditional prefix of a data line
#[derive(Debug, Clone, PartialEq)]
pub enum Guard {
    If(Condition),
    IfNot(Condition),
    Else,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// `MOD:` or `REGEX:`
    Plugin { name: String, regex: bool },
    /// `TAG:` with its `{{BASH:...}}` and `[...]` lists
    Tags(Vec<TagRef>),
    /// `SAY:`, `INC:`, `REQ:`, `DIRTY:`, `WARN:`, `ERROR:`
    Message { kind: MessageKind, content: String },
}

/// One Bash tag suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
    /// Came from a `[...]` list: the tag should be removed
    pub removed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Say,
    Warn,
    Error,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Say => "say",
            MessageKind::Warn => "warn",
            MessageKind::Error => "error",
        }
    }
}

/// Directive keyword as written in the legacy file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Mod,
    Regex,
    Tag,
    Say,
    Inc,
    Req,
    Dirty,
    Warn,
    Error,
}

impl Marker {
    pub const ALL: [Marker; 9] = [
        Marker::Mod,
        Marker::Regex,
        Marker::Tag,
        Marker::Say,
        Marker::Inc,
        Marker::Req,
        Marker::Dirty,
        Marker::Warn,
        Marker::Error,
    ];

    /// Keyword including the trailing colon
    pub fn keyword(&self) -> &'static str {
        match self {
            Marker::Mod => "MOD:",
            Marker::Regex => "REGEX:",
            Marker::Tag => "TAG:",
            Marker::Say => "SAY:",
            Marker::Inc => "INC:",
            Marker::Req => "REQ:",
            Marker::Dirty => "DIRTY:",
            Marker::Warn => "WARN:",
            Marker::Error => "ERROR:",
        }
    }

    /// Message markers consume the rest of the line as free text
    pub fn is_message(&self) -> bool {
        !matches!(self, Marker::Mod | Marker::Regex | Marker::Tag)
    }
}
