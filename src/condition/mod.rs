//! Legacy condition expressions.
//!
//! MF2 conditions (`FILE("x.esp") && !$VAR`) are parsed into a small tree
//! so `ELSE` can negate them structurally and rendering can apply the MF3
//! spelling (`file("x.esp") and not $var`) token by token.

mod expr;
mod lexer;

pub use expr::Condition;
pub use lexer::{tokenize, Token};
