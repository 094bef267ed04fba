use super::lexer::{tokenize, Token};
use crate::error::ConditionError;
use std::fmt;

/// Parsed legacy condition.
///
/// Leaves keep their raw tokens so that rendering can fold the case of
/// bare words while leaving literals inside call arguments untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `FILE("x.esp")`, `$VAR`, `"literal"`, ...
    Atom(Vec<Token>),
    Not(Box<Condition>),
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

impl Condition {
    /// Parse condition text such as `FILE("a.esp") && !ACTIVE("b.esp")`
    pub fn parse(text: &str) -> Result<Self, ConditionError> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(ConditionError::Empty);
        }

        let mut parser = Parser { tokens, pos: 0 };
        let cond = parser.parse_or()?;
        match parser.peek() {
            None => Ok(cond),
            Some(tok) => Err(ConditionError::UnexpectedToken(tok.describe())),
        }
    }

    /// Logical negation; negating a negation unwraps it.
    pub fn negate(self) -> Self {
        match self {
            Condition::Not(inner) => *inner,
            other => Condition::Not(Box::new(other)),
        }
    }

    fn is_compound(&self) -> bool {
        matches!(self, Condition::And(_) | Condition::Or(_))
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn parse_or(&mut self) -> Result<Condition, ConditionError> {
        let mut items = vec![self.parse_and()?];
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            items.push(self.parse_and()?);
        }
        Ok(if items.len() == 1 {
            items.remove(0)
        } else {
            Condition::Or(items)
        })
    }

    fn parse_and(&mut self) -> Result<Condition, ConditionError> {
        let mut items = vec![self.parse_unary()?];
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            items.push(self.parse_unary()?);
        }
        Ok(if items.len() == 1 {
            items.remove(0)
        } else {
            Condition::And(items)
        })
    }

    fn parse_unary(&mut self) -> Result<Condition, ConditionError> {
        if self.peek() == Some(&Token::Not) {
            self.pos += 1;
            return Ok(Condition::Not(Box::new(self.parse_unary()?)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Condition, ConditionError> {
        match self.next() {
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(tok) => Err(ConditionError::UnexpectedToken(tok.describe())),
                    None => Err(ConditionError::UnexpectedEnd),
                }
            }
            Some(tok @ Token::Quoted(_)) => Ok(Condition::Atom(vec![tok])),
            Some(tok @ Token::Word(_)) => {
                let mut atom = vec![tok];
                if self.peek() == Some(&Token::LParen) {
                    self.collect_call_args(&mut atom)?;
                }
                Ok(Condition::Atom(atom))
            }
            Some(tok) => Err(ConditionError::UnexpectedToken(tok.describe())),
            None => Err(ConditionError::UnexpectedEnd),
        }
    }

    /// Copy a balanced `( ... )` argument list into the atom verbatim
    fn collect_call_args(&mut self, atom: &mut Vec<Token>) -> Result<(), ConditionError> {
        let mut depth = 0usize;
        loop {
            let tok = self.next().ok_or(ConditionError::UnexpectedEnd)?;
            match tok {
                Token::LParen => depth += 1,
                Token::RParen => depth -= 1,
                _ => {}
            }
            atom.push(tok);
            if depth == 0 {
                return Ok(());
            }
        }
    }
}

fn needs_space(prev: &Token, next: &Token) -> bool {
    match (prev, next) {
        (_, Token::RParen) | (_, Token::Comma) => false,
        (Token::LParen, _) => false,
        (Token::Word(_), Token::LParen) => false,
        _ => true,
    }
}

fn write_token(f: &mut fmt::Formatter<'_>, tok: &Token) -> fmt::Result {
    match tok {
        Token::Word(w) => write!(f, "{}", w.to_lowercase()),
        Token::Quoted(q) => write!(f, "{}", q),
        Token::And => write!(f, "and"),
        Token::Or => write!(f, "or"),
        Token::Not => write!(f, "not"),
        Token::LParen => write!(f, "("),
        Token::RParen => write!(f, ")"),
        Token::Comma => write!(f, ","),
        Token::Compare(op) => write!(f, "{}", op),
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Atom(tokens) => {
                // A lone literal is a condition name, folded like a bare word
                if let [Token::Quoted(q)] = tokens.as_slice() {
                    let inner = q.strip_prefix('"').unwrap_or(q);
                    let inner = inner.strip_suffix('"').unwrap_or(inner);
                    return write!(f, "{}", inner.to_lowercase());
                }
                let mut prev: Option<&Token> = None;
                for tok in tokens {
                    if let Some(p) = prev {
                        if needs_space(p, tok) {
                            write!(f, " ")?;
                        }
                    }
                    write_token(f, tok)?;
                    prev = Some(tok);
                }
                Ok(())
            }
            Condition::Not(inner) => {
                if inner.is_compound() {
                    write!(f, "not ({})", inner)
                } else {
                    write!(f, "not {}", inner)
                }
            }
            Condition::And(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " and ")?;
                    }
                    if matches!(item, Condition::Or(_)) {
                        write!(f, "({})", item)?;
                    } else {
                        write!(f, "{}", item)?;
                    }
                }
                Ok(())
            }
            Condition::Or(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " or ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> String {
        Condition::parse(text).unwrap().to_string()
    }

    #[test]
    fn test_function_names_lowercased_literals_kept() {
        assert_eq!(render(r#"FILE("Foo Bar.esp")"#), r#"file("Foo Bar.esp")"#);
        assert_eq!(render("$FCOM"), "$fcom");
    }

    #[test]
    fn test_lone_literal_unquoted_and_lowercased() {
        assert_eq!(render(r#""A""#), "a");
        assert_eq!(render(r#"!"Foo Bar""#), "not foo bar");
        assert_eq!(render(r#""A" && FILE("B.esp")"#), r#"a and file("B.esp")"#);
    }

    #[test]
    fn test_operators_converted_once() {
        assert_eq!(
            render(r#"FILE("A.esp") && ACTIVE("B.esp") || $OOO"#),
            r#"file("A.esp") and active("B.esp") or $ooo"#
        );
        assert_eq!(
            render(r#"VERSION("Foo.esp", "1.0", =)"#),
            r#"version("Foo.esp", "1.0", ==)"#
        );
        assert_eq!(
            render(r#"VERSION("Foo.esp", "1.0", ==)"#),
            r#"version("Foo.esp", "1.0", ==)"#
        );
    }

    #[test]
    fn test_grouping_is_preserved_by_parentheses() {
        assert_eq!(
            render(r#"(FILE("a") || FILE("b")) && $X"#),
            r#"(file("a") or file("b")) and $x"#
        );
        assert_eq!(render("($FCOM)"), "$fcom");
    }

    #[test]
    fn test_negation_round_trips() {
        let cond = Condition::parse(r#"FILE("a.esp") || FILE("b.esp")"#).unwrap();
        let negated = cond.clone().negate();
        assert_eq!(negated.to_string(), r#"not (file("a.esp") or file("b.esp"))"#);
        assert_eq!(negated.negate(), cond);
    }

    #[test]
    fn test_negating_not_form_gives_positive() {
        let cond = Condition::parse(r#"!FILE("a.esp")"#).unwrap();
        assert_eq!(cond.negate().to_string(), r#"file("a.esp")"#);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Condition::parse("   "), Err(ConditionError::Empty));
        assert_eq!(
            Condition::parse(r#"FILE("a.esp""#),
            Err(ConditionError::UnexpectedEnd)
        );
        assert_eq!(
            Condition::parse("a b"),
            Err(ConditionError::UnexpectedToken("b".to_string()))
        );
        assert_eq!(Condition::parse("a &&"), Err(ConditionError::UnexpectedEnd));
    }
}
