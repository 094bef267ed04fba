//! Converter from the legacy MF2 plugin masterlist format to the
//! YAML-based MF3 format.
//!
//! The conversion is a single forward pass: each line is classified,
//! its guard resolved against the carried condition state, and the
//! resulting entries written out with fixed indentation.

pub mod condition;
pub mod converter;
pub mod emitter;
pub mod error;
pub mod escape;
pub mod parser;
pub mod report;

pub use converter::{convert, convert_str, run_converter, ConvertOptions, InputSource, OutputTarget};
pub use error::{ConditionError, ConvertError, Result};
pub use report::ConversionReport;
