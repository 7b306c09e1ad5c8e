use regex::RegexBuilder;

use crate::ast::{CmpOp, Expr, Field, Helper};
use crate::error::CompileError;
use crate::eval::Predicate;
use crate::token::{tokenize, Token};

/// Parenthesis/call nesting cap; adversarial input fails compilation instead
/// of exhausting the stack.
const MAX_DEPTH: usize = 64;

/// Compile condition source text into a reusable predicate. Deterministic:
/// the same text always yields the same outcome, success or failure.
pub fn compile(condition: &str) -> Result<Predicate, CompileError> {
    parse(condition).map(Predicate::new)
}

fn parse(condition: &str) -> Result<Expr, CompileError> {
    let tokens = tokenize(condition)?;
    if tokens.is_empty() {
        return Err(CompileError::EmptyCondition);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or(0)?;
    match parser.peek() {
        None => Ok(expr),
        Some(tok) => Err(CompileError::Unexpected {
            expected: "end of condition",
            found: tok.to_string(),
        }),
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
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<(), CompileError> {
        match self.next() {
            Some(found) if found == token => Ok(()),
            Some(found) => Err(CompileError::Unexpected {
                expected,
                found: found.to_string(),
            }),
            None => Err(CompileError::UnexpectedEnd(expected)),
        }
    }

    fn parse_or(&mut self, depth: usize) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_and(depth)?;
        while self.eat(&Token::Or) {
            let rhs = self.parse_and(depth)?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self, depth: usize) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_comparison(depth)?;
        while self.eat(&Token::And) {
            let rhs = self.parse_comparison(depth)?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self, depth: usize) -> Result<Expr, CompileError> {
        let lhs = self.parse_postfix(depth)?;
        let op = match self.peek() {
            Some(Token::Eq) => CmpOp::Eq,
            Some(Token::Ne) => CmpOp::Ne,
            Some(Token::Gt) => CmpOp::Gt,
            Some(Token::Lt) => CmpOp::Lt,
            Some(Token::Ge) => CmpOp::Ge,
            Some(Token::Le) => CmpOp::Le,
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.parse_postfix(depth)?;

        // Comparisons do not chain; `a < b < c` is out of grammar.
        if let Some(
            tok @ (Token::Eq | Token::Ne | Token::Gt | Token::Lt | Token::Ge | Token::Le),
        ) = self.peek()
        {
            return Err(CompileError::Unexpected {
                expected: "`&&`, `||`, or end of condition",
                found: tok.to_string(),
            });
        }

        Ok(Expr::Comparison {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn parse_postfix(&mut self, depth: usize) -> Result<Expr, CompileError> {
        let mut expr = self.parse_primary(depth)?;
        while self.eat(&Token::Dot) {
            let method = match self.next() {
                Some(Token::Ident(name)) => name,
                Some(found) => {
                    return Err(CompileError::Unexpected {
                        expected: "a method name",
                        found: found.to_string(),
                    })
                }
                None => return Err(CompileError::UnexpectedEnd("a method name")),
            };
            if method != "includes" {
                return Err(CompileError::UnknownMethod(method));
            }
            self.expect(Token::LParen, "`(`")?;
            let arg = self.parse_or(depth + 1)?;
            self.expect(Token::RParen, "`)`")?;

            expr = Expr::Includes {
                target: Box::new(expr),
                needle: Box::new(arg),
            };
        }
        Ok(expr)
    }

    fn parse_primary(&mut self, depth: usize) -> Result<Expr, CompileError> {
        if depth > MAX_DEPTH {
            return Err(CompileError::TooDeep);
        }

        match self.next() {
            None => Err(CompileError::UnexpectedEnd("an expression")),
            Some(Token::Str(s)) => Ok(Expr::StringLit(s)),
            Some(Token::Number(n)) => Ok(Expr::NumberLit(n)),
            Some(Token::LParen) => {
                let expr = self.parse_or(depth + 1)?;
                self.expect(Token::RParen, "`)`")?;
                Ok(expr)
            }
            Some(Token::Regex { pattern, flags }) => self.parse_regex_test(&pattern, &flags, depth),
            Some(Token::Ident(name)) => match name.as_str() {
                "true" => Ok(Expr::BoolLit(true)),
                "false" => Ok(Expr::BoolLit(false)),
                "transaction" => {
                    self.expect(Token::Dot, "`.` after `transaction`")?;
                    match self.next() {
                        Some(Token::Ident(field)) => Field::from_name(&field)
                            .map(Expr::Field)
                            .ok_or(CompileError::UnknownField(field)),
                        Some(found) => Err(CompileError::Unexpected {
                            expected: "a transaction field",
                            found: found.to_string(),
                        }),
                        None => Err(CompileError::UnexpectedEnd("a transaction field")),
                    }
                }
                _ => match Helper::from_name(&name) {
                    Some(helper) => {
                        self.expect(Token::LParen, "`(`")?;
                        let arg = self.parse_or(depth + 1)?;
                        self.expect(Token::RParen, "`)`")?;
                        Ok(Expr::HelperCall {
                            helper,
                            arg: Box::new(arg),
                        })
                    }
                    None => Err(CompileError::UnknownIdentifier(name)),
                },
            },
            Some(found) => Err(CompileError::Unexpected {
                expected: "an expression",
                found: found.to_string(),
            }),
        }
    }

    /// A regex literal is only meaningful as the receiver of `.test(...)`.
    fn parse_regex_test(
        &mut self,
        pattern: &str,
        flags: &str,
        depth: usize,
    ) -> Result<Expr, CompileError> {
        let mut builder = RegexBuilder::new(pattern);
        for flag in flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                other => return Err(CompileError::UnsupportedRegexFlag(other)),
            }
        }
        let regex = builder
            .build()
            .map_err(|e| CompileError::InvalidRegex(e.to_string()))?;

        self.expect(Token::Dot, "`.test(...)` after a regex literal")?;
        match self.next() {
            Some(Token::Ident(name)) if name == "test" => {}
            Some(Token::Ident(name)) => return Err(CompileError::UnknownMethod(name)),
            Some(found) => {
                return Err(CompileError::Unexpected {
                    expected: "`test`",
                    found: found.to_string(),
                })
            }
            None => return Err(CompileError::UnexpectedEnd("`test`")),
        }
        self.expect(Token::LParen, "`(`")?;
        let target = self.parse_or(depth + 1)?;
        self.expect(Token::RParen, "`)`")?;

        Ok(Expr::RegexMatch {
            regex,
            target: Box::new(target),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_comparison_chain() {
        assert!(compile(r#"transaction.merchant === "Walmart" && transaction.amount < 80"#).is_ok());
    }

    #[test]
    fn compiles_parenthesized_precedence() {
        assert!(compile(
            r#"(transaction.merchant === "A" || transaction.merchant === "B") && transaction.amount <= 80"#
        )
        .is_ok());
    }

    #[test]
    fn compiles_helper_call() {
        assert!(compile("dayOfWeek(transaction.date) === 6").is_ok());
        assert!(compile("isWeekend(transaction.date)").is_ok());
    }

    #[test]
    fn compiles_includes_and_regex() {
        assert!(compile(r#"transaction.merchant.includes("Wal")"#).is_ok());
        assert!(compile("/wal.*t/i.test(transaction.merchant)").is_ok());
    }

    #[test]
    fn rejects_unknown_identifier() {
        assert_eq!(
            compile("bogus === 1").unwrap_err(),
            CompileError::UnknownIdentifier("bogus".to_string())
        );
    }

    #[test]
    fn rejects_unknown_helper() {
        assert_eq!(
            compile("quarter(transaction.date) === 1").unwrap_err(),
            CompileError::UnknownIdentifier("quarter".to_string())
        );
    }

    #[test]
    fn rejects_unknown_field() {
        assert_eq!(
            compile("transaction.memo === \"x\"").unwrap_err(),
            CompileError::UnknownField("memo".to_string())
        );
    }

    #[test]
    fn rejects_unknown_method() {
        assert_eq!(
            compile("transaction.merchant.nonExistentMethod()").unwrap_err(),
            CompileError::UnknownMethod("nonExistentMethod".to_string())
        );
        assert_eq!(
            compile(r#"transaction.merchant.startsWith("W")"#).unwrap_err(),
            CompileError::UnknownMethod("startsWith".to_string())
        );
    }

    #[test]
    fn rejects_unbalanced_parens() {
        assert_eq!(
            compile("(transaction.amount < 5").unwrap_err(),
            CompileError::UnexpectedEnd("`)`")
        );
        assert!(matches!(
            compile("transaction.amount < 5)").unwrap_err(),
            CompileError::Unexpected { .. }
        ));
    }

    #[test]
    fn rejects_chained_comparison() {
        assert!(matches!(
            compile("1 < transaction.amount < 80").unwrap_err(),
            CompileError::Unexpected { .. }
        ));
    }

    #[test]
    fn rejects_unsupported_regex_flag() {
        assert_eq!(
            compile("/wal/g.test(transaction.merchant)").unwrap_err(),
            CompileError::UnsupportedRegexFlag('g')
        );
    }

    #[test]
    fn rejects_bare_regex_literal() {
        assert_eq!(
            compile("/wal/").unwrap_err(),
            CompileError::UnexpectedEnd("`.test(...)` after a regex literal")
        );
    }

    #[test]
    fn rejects_invalid_regex() {
        assert!(matches!(
            compile("/(/.test(transaction.merchant)").unwrap_err(),
            CompileError::InvalidRegex(_)
        ));
    }

    #[test]
    fn rejects_empty_condition() {
        assert_eq!(compile("   ").unwrap_err(), CompileError::EmptyCondition);
    }

    #[test]
    fn rejects_excessive_nesting() {
        let condition = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(compile(&condition).unwrap_err(), CompileError::TooDeep);
    }

    #[test]
    fn rejects_trailing_tokens() {
        assert!(matches!(
            compile(r#"transaction.merchant === "Walmart" "No Arrow""#).unwrap_err(),
            CompileError::Unexpected { .. }
        ));
    }
}
