//! Error types for masterlist conversion

use std::path::PathBuf;
use thiserror::Error;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors raised while reading a legacy masterlist.
///
/// Every malformed-input variant carries the 1-based line number of the
/// offending line. The converter stops at the first one it meets.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Reading the input or writing the output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file could not be opened
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be written
    #[error("cannot write {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `ELSE` seen before any `IF` or `IFNOT`
    #[error("line {line}: ELSE without a preceding IF")]
    OrphanElse { line: usize },

    /// `*/` seen while not inside a block comment
    #[error("line {line}: block comment closed but never opened")]
    UnbalancedCommentClose { line: usize },

    /// Input ended inside a block comment
    #[error("line {line}: block comment opened here is never closed")]
    UnterminatedBlockComment { line: usize },

    /// `[` without `]`, or `{{BASH:` without `}}`
    #[error("line {line}: unterminated tag list, missing '{expected}'")]
    UnterminatedTagList { line: usize, expected: &'static str },

    /// Condition text after IF/IFNOT does not parse
    #[error("line {line}: invalid condition: {source}")]
    Condition {
        line: usize,
        #[source]
        source: ConditionError,
    },

    /// `MOD:` or `REGEX:` with nothing after the marker
    #[error("line {line}: empty plugin name")]
    EmptyPluginName { line: usize },

    /// Report serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the condition lexer and parser
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConditionError {
    #[error("empty condition")]
    Empty,

    #[error("unterminated string literal starting at column {0}")]
    UnterminatedQuote(usize),

    #[error("unexpected '{0}'")]
    UnexpectedToken(String),

    #[error("unexpected end of condition")]
    UnexpectedEnd,
}
