mod classifier;
mod directives;
mod types;

pub use classifier::{classify_line, is_skipped_construct};
pub use directives::{build_directive, find_markers, parse_prefix, parse_tag_lists, MarkerSpan};
pub use types::{DataLine, Directive, Guard, LineKind, Marker, MessageKind, TagRef};
