use std::fmt;
use std::iter::Peekable;
use std::str::{Chars, FromStr};

use rust_decimal::Decimal;

use crate::error::CompileError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),
    Number(Decimal),
    /// Regex literal `/pattern/flags`, compiled later by the parser.
    Regex { pattern: String, flags: String },
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    And,
    Or,
    LParen,
    RParen,
    Dot,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "identifier `{name}`"),
            Token::Str(_) => write!(f, "string literal"),
            Token::Number(n) => write!(f, "number `{n}`"),
            Token::Regex { .. } => write!(f, "regex literal"),
            Token::Eq => write!(f, "`===`"),
            Token::Ne => write!(f, "`!==`"),
            Token::Gt => write!(f, "`>`"),
            Token::Lt => write!(f, "`<`"),
            Token::Ge => write!(f, "`>=`"),
            Token::Le => write!(f, "`<=`"),
            Token::And => write!(f, "`&&`"),
            Token::Or => write!(f, "`||`"),
            Token::LParen => write!(f, "`(`"),
            Token::RParen => write!(f, "`)`"),
            Token::Dot => write!(f, "`.`"),
        }
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, CompileError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '.' => {
                chars.next();
                tokens.push(Token::Dot);
            }
            '"' => {
                chars.next();
                tokens.push(Token::Str(lex_string(&mut chars)?));
            }
            '/' => {
                chars.next();
                tokens.push(lex_regex(&mut chars)?);
            }
            '=' | '!' => tokens.push(lex_equality(&mut chars)?),
            '>' => {
                chars.next();
                tokens.push(if chars.next_if_eq(&'=').is_some() {
                    Token::Ge
                } else {
                    Token::Gt
                });
            }
            '<' => {
                chars.next();
                tokens.push(if chars.next_if_eq(&'=').is_some() {
                    Token::Le
                } else {
                    Token::Lt
                });
            }
            '&' => {
                chars.next();
                if chars.next_if_eq(&'&').is_none() {
                    return Err(CompileError::UnknownOperator("&".to_string()));
                }
                tokens.push(Token::And);
            }
            '|' => {
                chars.next();
                if chars.next_if_eq(&'|').is_none() {
                    return Err(CompileError::UnknownOperator("|".to_string()));
                }
                tokens.push(Token::Or);
            }
            '-' => {
                chars.next();
                match chars.peek() {
                    Some(d) if d.is_ascii_digit() => tokens.push(lex_number(&mut chars, true)?),
                    _ => return Err(CompileError::UnexpectedChar('-')),
                }
            }
            c if c.is_ascii_digit() => tokens.push(lex_number(&mut chars, false)?),
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            }
            other => return Err(CompileError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

fn lex_string(chars: &mut Peekable<Chars<'_>>) -> Result<String, CompileError> {
    let mut value = String::new();
    loop {
        match chars.next() {
            None => return Err(CompileError::UnterminatedString),
            Some('"') => return Ok(value),
            Some('\\') => match chars.next() {
                None => return Err(CompileError::UnterminatedString),
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some(escaped) => value.push(escaped),
            },
            Some(c) => value.push(c),
        }
    }
}

/// Lex the remainder of a `/pattern/flags` literal. Escaped slashes are
/// unescaped; every other escape sequence is kept verbatim for the regex
/// engine to interpret.
fn lex_regex(chars: &mut Peekable<Chars<'_>>) -> Result<Token, CompileError> {
    let mut pattern = String::new();
    loop {
        match chars.next() {
            None => return Err(CompileError::UnterminatedRegex),
            Some('/') => break,
            Some('\\') => match chars.next() {
                None => return Err(CompileError::UnterminatedRegex),
                Some('/') => pattern.push('/'),
                Some(escaped) => {
                    pattern.push('\\');
                    pattern.push(escaped);
                }
            },
            Some(c) => pattern.push(c),
        }
    }

    let mut flags = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphabetic() {
            flags.push(c);
            chars.next();
        } else {
            break;
        }
    }

    Ok(Token::Regex { pattern, flags })
}

/// `===` and `!==` only; the sloppy `==`/`!=` forms are not part of the
/// grammar and fail here rather than silently loosening equality.
fn lex_equality(chars: &mut Peekable<Chars<'_>>) -> Result<Token, CompileError> {
    let first = chars.next().unwrap_or('=');
    let mut op = String::from(first);
    while chars.next_if_eq(&'=').is_some() {
        op.push('=');
    }
    match op.as_str() {
        "===" => Ok(Token::Eq),
        "!==" => Ok(Token::Ne),
        _ => Err(CompileError::UnknownOperator(op)),
    }
}

fn lex_number(chars: &mut Peekable<Chars<'_>>, negative: bool) -> Result<Token, CompileError> {
    let mut digits = String::new();
    if negative {
        digits.push('-');
    }
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            digits.push(c);
            chars.next();
        } else {
            break;
        }
    }

    // A trailing `.` only belongs to the number when a digit follows;
    // otherwise it is a method-call dot.
    if chars.peek() == Some(&'.') {
        let mut ahead = chars.clone();
        ahead.next();
        if matches!(ahead.peek(), Some(d) if d.is_ascii_digit()) {
            digits.push('.');
            chars.next();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_digit() {
                    digits.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
        }
    }

    Decimal::from_str(&digits)
        .map(Token::Number)
        .map_err(|_| CompileError::InvalidNumber(digits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_field_comparison() {
        let tokens = tokenize(r#"transaction.merchant === "Walmart""#).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("transaction".to_string()),
                Token::Dot,
                Token::Ident("merchant".to_string()),
                Token::Eq,
                Token::Str("Walmart".to_string()),
            ]
        );
    }

    #[test]
    fn tokenizes_numbers_and_ordering() {
        let tokens = tokenize("transaction.amount >= 79.99").unwrap();
        assert_eq!(tokens[3], Token::Ge);
        assert_eq!(tokens[4], Token::Number(Decimal::new(7999, 2)));
    }

    #[test]
    fn tokenizes_negative_number() {
        let tokens = tokenize("transaction.amount < -5").unwrap();
        assert_eq!(tokens[4], Token::Number(Decimal::new(-5, 0)));
    }

    #[test]
    fn number_dot_method_is_not_a_decimal_point() {
        // `5.includes` must lex as number, dot, identifier.
        let tokens = tokenize(r#"5.includes("x")"#).unwrap();
        assert_eq!(tokens[0], Token::Number(Decimal::new(5, 0)));
        assert_eq!(tokens[1], Token::Dot);
    }

    #[test]
    fn tokenizes_regex_literal_with_flags() {
        let tokens = tokenize("/wal.*t/i").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Regex {
                pattern: "wal.*t".to_string(),
                flags: "i".to_string(),
            }]
        );
    }

    #[test]
    fn regex_escaped_slash_is_unescaped() {
        let tokens = tokenize(r"/a\/b/").unwrap();
        assert_eq!(
            tokens[0],
            Token::Regex {
                pattern: "a/b".to_string(),
                flags: String::new(),
            }
        );
    }

    #[test]
    fn regex_keeps_class_escapes() {
        let tokens = tokenize(r"/\d+/").unwrap();
        assert_eq!(
            tokens[0],
            Token::Regex {
                pattern: r"\d+".to_string(),
                flags: String::new(),
            }
        );
    }

    #[test]
    fn string_escapes() {
        let tokens = tokenize(r#""say \"hi\"\n""#).unwrap();
        assert_eq!(tokens[0], Token::Str("say \"hi\"\n".to_string()));
    }

    #[test]
    fn rejects_loose_equality() {
        assert_eq!(
            tokenize("transaction.amount == 5"),
            Err(CompileError::UnknownOperator("==".to_string()))
        );
        assert_eq!(
            tokenize("transaction.amount != 5"),
            Err(CompileError::UnknownOperator("!=".to_string()))
        );
    }

    #[test]
    fn rejects_single_ampersand_and_pipe() {
        assert_eq!(
            tokenize("a & b"),
            Err(CompileError::UnknownOperator("&".to_string()))
        );
        assert_eq!(
            tokenize("a | b"),
            Err(CompileError::UnknownOperator("|".to_string()))
        );
    }

    #[test]
    fn rejects_unterminated_string() {
        assert_eq!(
            tokenize(r#"transaction.merchant === "Walmart"#),
            Err(CompileError::UnterminatedString)
        );
    }

    #[test]
    fn rejects_unterminated_regex() {
        assert_eq!(tokenize("/abc"), Err(CompileError::UnterminatedRegex));
    }

    #[test]
    fn rejects_stray_characters() {
        assert_eq!(tokenize("a; b"), Err(CompileError::UnexpectedChar(';')));
        assert_eq!(tokenize("a - b"), Err(CompileError::UnexpectedChar('-')));
    }
}
