use crate::condition::Condition;
use crate::error::{ConvertError, Result};
use crate::parser::Guard;

/// Block comment tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentState {
    Normal,
    InBlockComment { opened_at: usize },
}

/// State carried from one line to the next
#[derive(Debug)]
pub struct ConverterContext {
    active_condition: Option<Condition>,
    comment_state: CommentState,
}

impl Default for ConverterContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterContext {
    pub fn new() -> Self {
        Self {
            active_condition: None,
            comment_state: CommentState::Normal,
        }
    }

    pub fn comment_state(&self) -> CommentState {
        self.comment_state
    }

    pub fn in_block_comment(&self) -> bool {
        matches!(self.comment_state, CommentState::InBlockComment { .. })
    }

    /// Enter block-comment mode; a nested open keeps the first position
    pub fn open_block_comment(&mut self, line_no: usize) {
        if !self.in_block_comment() {
            self.comment_state = CommentState::InBlockComment { opened_at: line_no };
        }
    }

    pub fn close_block_comment(&mut self) {
        self.comment_state = CommentState::Normal;
    }

    /// Condition set by the most recent IF or IFNOT
    pub fn active_condition(&self) -> Option<&Condition> {
        self.active_condition.as_ref()
    }

    /// Turn a line's guard into the condition its entries carry.
    ///
    /// `IF`/`IFNOT` replace the active condition. `ELSE` yields the
    /// negation of the active condition and leaves it in place.
    pub fn resolve_guard(&mut self, guard: Option<Guard>, line_no: usize) -> Result<Option<Condition>> {
        let cond = match guard {
            None => return Ok(None),
            Some(Guard::If(cond)) => cond,
            Some(Guard::IfNot(cond)) => cond.negate(),
            Some(Guard::Else) => {
                return self
                    .active_condition
                    .clone()
                    .map(|c| Some(c.negate()))
                    .ok_or(ConvertError::OrphanElse { line: line_no });
            }
        };

        self.active_condition = Some(cond.clone());
        Ok(Some(cond))
    }

    /// Check end-of-input invariants
    pub fn finish(&self) -> Result<()> {
        match self.comment_state {
            CommentState::InBlockComment { opened_at } => {
                Err(ConvertError::UnterminatedBlockComment { line: opened_at })
            }
            CommentState::Normal => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cond(text: &str) -> Condition {
        Condition::parse(text).unwrap()
    }

    #[test]
    fn test_else_negates_last_if() {
        let mut ctx = ConverterContext::new();
        let a = ctx.resolve_guard(Some(Guard::If(cond("A"))), 1).unwrap();
        assert_eq!(a.unwrap().to_string(), "a");

        assert!(ctx.resolve_guard(None, 2).unwrap().is_none());

        let e = ctx.resolve_guard(Some(Guard::Else), 3).unwrap().unwrap();
        assert_eq!(e.to_string(), "not a");

        // A second ELSE still refers to the same IF
        let e = ctx.resolve_guard(Some(Guard::Else), 4).unwrap().unwrap();
        assert_eq!(e.to_string(), "not a");
        assert_eq!(ctx.active_condition(), Some(&cond("A")));
    }

    #[test]
    fn test_else_after_ifnot_is_positive() {
        let mut ctx = ConverterContext::new();
        ctx.resolve_guard(Some(Guard::IfNot(cond("FILE(\"x.esp\")"))), 1)
            .unwrap();
        let e = ctx.resolve_guard(Some(Guard::Else), 2).unwrap().unwrap();
        assert_eq!(e.to_string(), "file(\"x.esp\")");
    }

    #[test]
    fn test_orphan_else_rejected() {
        let mut ctx = ConverterContext::new();
        assert!(matches!(
            ctx.resolve_guard(Some(Guard::Else), 5),
            Err(ConvertError::OrphanElse { line: 5 })
        ));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let mut ctx = ConverterContext::new();
        ctx.open_block_comment(2);
        ctx.open_block_comment(4);
        assert!(matches!(
            ctx.finish(),
            Err(ConvertError::UnterminatedBlockComment { line: 2 })
        ));
        ctx.close_block_comment();
        assert!(ctx.finish().is_ok());
    }
}
