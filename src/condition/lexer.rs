use crate::error::ConditionError;

/// A single token of a legacy condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bare word: function name, variable, version or checksum
    Word(String),
    /// Double-quoted literal, quotes included
    Quoted(String),
    And,   // &&
    Or,    // ||
    Not,   // !
    LParen,
    RParen,
    Comma,
    /// Comparison operator, already normalized (`=` becomes `==`)
    Compare(&'static str),
}

impl Token {
    /// Text used when this token appears in error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Word(w) => w.clone(),
            Token::Quoted(q) => q.clone(),
            Token::And => "&&".to_string(),
            Token::Or => "||".to_string(),
            Token::Not => "!".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Comma => ",".to_string(),
            Token::Compare(op) => op.to_string(),
        }
    }
}

fn is_word_char(ch: char) -> bool {
    !ch.is_whitespace() && !matches!(ch, '"' | '&' | '|' | '!' | '(' | ')' | ',' | '=' | '<' | '>')
}

/// Split condition text into tokens, honoring double quotes.
pub fn tokenize(text: &str) -> Result<Vec<Token>, ConditionError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        if ch.is_whitespace() {
            continue;
        }

        match ch {
            '"' => {
                let mut lit = String::from('"');
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    lit.push(c);
                    if c == '"' {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(ConditionError::UnterminatedQuote(pos + 1));
                }
                tokens.push(Token::Quoted(lit));
            }
            '&' => {
                if chars.peek().map(|&(_, c)| c) == Some('&') {
                    chars.next();
                    tokens.push(Token::And);
                } else {
                    return Err(ConditionError::UnexpectedToken("&".to_string()));
                }
            }
            '|' => {
                if chars.peek().map(|&(_, c)| c) == Some('|') {
                    chars.next();
                    tokens.push(Token::Or);
                } else {
                    return Err(ConditionError::UnexpectedToken("|".to_string()));
                }
            }
            '!' => {
                if chars.peek().map(|&(_, c)| c) == Some('=') {
                    chars.next();
                    tokens.push(Token::Compare("!="));
                } else {
                    tokens.push(Token::Not);
                }
            }
            '=' => {
                // Legacy `=` and `==` both mean equality
                if chars.peek().map(|&(_, c)| c) == Some('=') {
                    chars.next();
                }
                tokens.push(Token::Compare("=="));
            }
            '<' | '>' => {
                let op = if chars.peek().map(|&(_, c)| c) == Some('=') {
                    chars.next();
                    if ch == '<' {
                        "<="
                    } else {
                        ">="
                    }
                } else if ch == '<' {
                    "<"
                } else {
                    ">"
                };
                tokens.push(Token::Compare(op));
            }
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            ',' => tokens.push(Token::Comma),
            _ => {
                let mut word = String::new();
                word.push(ch);
                while let Some(&(_, c)) = chars.peek() {
                    if !is_word_char(c) {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(Token::Word(word));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_call_tokens() {
        let tokens = tokenize(r#"FILE("Foo Bar.esp")"#).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Word("FILE".to_string()),
                Token::LParen,
                Token::Quoted("\"Foo Bar.esp\"".to_string()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_operators_inside_quotes_are_literal() {
        let tokens = tokenize(r#""a && b" || c"#).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Quoted("\"a && b\"".to_string()),
                Token::Or,
                Token::Word("c".to_string()),
            ]
        );
    }

    #[test]
    fn test_comparators() {
        let tokens = tokenize("= == != <= > !").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Compare("=="),
                Token::Compare("=="),
                Token::Compare("!="),
                Token::Compare("<="),
                Token::Compare(">"),
                Token::Not,
            ]
        );
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(
            tokenize(r#"FILE("abc)"#),
            Err(ConditionError::UnterminatedQuote(6))
        );
    }

    #[test]
    fn test_single_ampersand_rejected() {
        assert!(matches!(
            tokenize("a & b"),
            Err(ConditionError::UnexpectedToken(_))
        ));
    }
}
