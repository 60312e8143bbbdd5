//! Pratt parser for template expressions

use super::tokenizer::{Spanned, Token, tokenize};
use crate::ast::{BinaryOperator, ExpressionNode, LiteralValue, UnaryOperator};
use crate::error::{ExprError, Result};

/// Operator precedence levels (higher = tighter binding)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Ternary conditional (right associative)
    Ternary = 1,
    /// Logical OR
    Or = 2,
    /// Logical AND
    And = 3,
    /// Equality operators (==, !=)
    Equality = 4,
    /// Ordering operators (<, <=, >, >=)
    Comparison = 5,
    /// Additive operators (+, -)
    Additive = 6,
    /// Multiplicative operators (*, /, %)
    Multiplicative = 7,
    /// Unary operators (-, !)
    Unary = 8,
    /// Property access and indexing (., [])
    Postfix = 9,
}

impl Precedence {
    /// Raw binding power for comparisons in the parsing loop
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

fn binary_operator(token: &Token) -> Option<(BinaryOperator, Precedence)> {
    match token {
        Token::Or => Some((BinaryOperator::Or, Precedence::Or)),
        Token::And => Some((BinaryOperator::And, Precedence::And)),
        Token::Equal => Some((BinaryOperator::Equal, Precedence::Equality)),
        Token::NotEqual => Some((BinaryOperator::NotEqual, Precedence::Equality)),
        Token::LessThan => Some((BinaryOperator::LessThan, Precedence::Comparison)),
        Token::LessThanOrEqual => Some((BinaryOperator::LessThanOrEqual, Precedence::Comparison)),
        Token::GreaterThan => Some((BinaryOperator::GreaterThan, Precedence::Comparison)),
        Token::GreaterThanOrEqual => {
            Some((BinaryOperator::GreaterThanOrEqual, Precedence::Comparison))
        }
        Token::Plus => Some((BinaryOperator::Add, Precedence::Additive)),
        Token::Minus => Some((BinaryOperator::Subtract, Precedence::Additive)),
        Token::Star => Some((BinaryOperator::Multiply, Precedence::Multiplicative)),
        Token::Slash => Some((BinaryOperator::Divide, Precedence::Multiplicative)),
        Token::Percent => Some((BinaryOperator::Modulo, Precedence::Multiplicative)),
        _ => None,
    }
}

/// Parse a template expression string into an AST
pub fn parse_expression(input: &str) -> Result<ExpressionNode> {
    let tokens = tokenize(input)?;
    let mut stream = TokenStream::new(tokens, input.len());
    let expr = parse_expr(&mut stream, 0)?;
    match stream.peek() {
        Some(token) => Err(ExprError::parse_error(
            token.start,
            format!("unexpected token '{}'", token.value),
        )),
        None => Ok(expr),
    }
}

struct TokenStream {
    tokens: Vec<Spanned<Token>>,
    position: usize,
    input_len: usize,
}

impl TokenStream {
    fn new(tokens: Vec<Spanned<Token>>, input_len: usize) -> Self {
        Self {
            tokens,
            position: 0,
            input_len,
        }
    }

    fn peek(&self) -> Option<&Spanned<Token>> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Spanned<Token>> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        match self.next() {
            Some(token) if token.value == *expected => Ok(()),
            Some(token) => Err(ExprError::parse_error(
                token.start,
                format!("expected '{expected}', found '{}'", token.value),
            )),
            None => Err(self.eof(&format!("expected '{expected}'"))),
        }
    }

    fn eof(&self, message: &str) -> ExprError {
        ExprError::parse_error(self.input_len, format!("{message}, found end of input"))
    }
}

fn parse_expr(stream: &mut TokenStream, min_bp: u8) -> Result<ExpressionNode> {
    let mut lhs = parse_prefix(stream)?;

    loop {
        let Some(token) = stream.peek() else { break };
        match &token.value {
            Token::Dot => {
                if Precedence::Postfix.as_u8() < min_bp {
                    break;
                }
                stream.next();
                let path = expect_identifier(stream)?;
                lhs = ExpressionNode::Path {
                    base: Box::new(lhs),
                    path,
                };
            }
            Token::LeftBracket => {
                if Precedence::Postfix.as_u8() < min_bp {
                    break;
                }
                stream.next();
                let index = parse_expr(stream, 0)?;
                stream.expect(&Token::RightBracket)?;
                lhs = ExpressionNode::Index {
                    base: Box::new(lhs),
                    index: Box::new(index),
                };
            }
            Token::Question => {
                if Precedence::Ternary.as_u8() < min_bp {
                    break;
                }
                stream.next();
                let then_expr = parse_expr(stream, 0)?;
                stream.expect(&Token::Colon)?;
                // Right associative: a ? b : c ? d : e nests to the right
                let else_expr = parse_expr(stream, Precedence::Ternary.as_u8())?;
                lhs = ExpressionNode::Conditional {
                    condition: Box::new(lhs),
                    then_expr: Box::new(then_expr),
                    else_expr: Box::new(else_expr),
                };
            }
            other => {
                let Some((op, precedence)) = binary_operator(other) else {
                    break;
                };
                if precedence.as_u8() < min_bp {
                    break;
                }
                stream.next();
                let rhs = parse_expr(stream, precedence.as_u8() + 1)?;
                lhs = ExpressionNode::BinaryOp {
                    op,
                    left: Box::new(lhs),
                    right: Box::new(rhs),
                };
            }
        }
    }

    Ok(lhs)
}

fn parse_prefix(stream: &mut TokenStream) -> Result<ExpressionNode> {
    let Some(token) = stream.next() else {
        return Err(stream.eof("expected expression"));
    };

    match token.value {
        Token::Integer(i) => Ok(ExpressionNode::Literal(LiteralValue::Integer(i))),
        Token::Decimal(d) => Ok(ExpressionNode::Literal(LiteralValue::Decimal(d))),
        Token::String(s) => Ok(ExpressionNode::Literal(LiteralValue::String(s))),
        Token::Boolean(b) => Ok(ExpressionNode::Literal(LiteralValue::Boolean(b))),
        Token::Null => Ok(ExpressionNode::Literal(LiteralValue::Null)),
        Token::Identifier(name) => Ok(ExpressionNode::Identifier(name)),
        Token::Variable(name) => Ok(ExpressionNode::Variable(name)),
        Token::Minus => {
            let operand = parse_expr(stream, Precedence::Unary.as_u8())?;
            Ok(ExpressionNode::UnaryOp {
                op: UnaryOperator::Minus,
                operand: Box::new(operand),
            })
        }
        Token::Bang => {
            let operand = parse_expr(stream, Precedence::Unary.as_u8())?;
            Ok(ExpressionNode::UnaryOp {
                op: UnaryOperator::Not,
                operand: Box::new(operand),
            })
        }
        Token::LeftParen => {
            let expr = parse_expr(stream, 0)?;
            stream.expect(&Token::RightParen)?;
            Ok(expr)
        }
        other => Err(ExprError::parse_error(
            token.start,
            format!("unexpected token '{other}'"),
        )),
    }
}

fn expect_identifier(stream: &mut TokenStream) -> Result<String> {
    match stream.next() {
        Some(Spanned {
            value: Token::Identifier(name),
            ..
        }) => Ok(name),
        Some(token) => Err(ExprError::parse_error(
            token.start,
            format!("expected property name, found '{}'", token.value),
        )),
        None => Err(stream.eof("expected property name")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal_int(i: i64) -> ExpressionNode {
        ExpressionNode::Literal(LiteralValue::Integer(i))
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let expr = parse_expression("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            ExpressionNode::BinaryOp {
                op: BinaryOperator::Add,
                left: Box::new(literal_int(1)),
                right: Box::new(ExpressionNode::BinaryOp {
                    op: BinaryOperator::Multiply,
                    left: Box::new(literal_int(2)),
                    right: Box::new(literal_int(3)),
                }),
            }
        );
    }

    #[test]
    fn test_left_associativity() {
        // 10 - 2 - 3 parses as (10 - 2) - 3
        let expr = parse_expression("10 - 2 - 3").unwrap();
        assert_eq!(
            expr,
            ExpressionNode::BinaryOp {
                op: BinaryOperator::Subtract,
                left: Box::new(ExpressionNode::BinaryOp {
                    op: BinaryOperator::Subtract,
                    left: Box::new(literal_int(10)),
                    right: Box::new(literal_int(2)),
                }),
                right: Box::new(literal_int(3)),
            }
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let expr = parse_expression("(1 + 2) * 3").unwrap();
        assert_eq!(
            expr,
            ExpressionNode::BinaryOp {
                op: BinaryOperator::Multiply,
                left: Box::new(ExpressionNode::BinaryOp {
                    op: BinaryOperator::Add,
                    left: Box::new(literal_int(1)),
                    right: Box::new(literal_int(2)),
                }),
                right: Box::new(literal_int(3)),
            }
        );
    }

    #[test]
    fn test_path_and_index() {
        let expr = parse_expression("caches[0].name").unwrap();
        assert_eq!(
            expr,
            ExpressionNode::Path {
                base: Box::new(ExpressionNode::Index {
                    base: Box::new(ExpressionNode::Identifier("caches".to_string())),
                    index: Box::new(literal_int(0)),
                }),
                path: "name".to_string(),
            }
        );
    }

    #[test]
    fn test_ternary() {
        let expr = parse_expression("#prod ? 'big' : 'small'").unwrap();
        assert_eq!(
            expr,
            ExpressionNode::Conditional {
                condition: Box::new(ExpressionNode::Variable("prod".to_string())),
                then_expr: Box::new(ExpressionNode::Literal(LiteralValue::String(
                    "big".to_string()
                ))),
                else_expr: Box::new(ExpressionNode::Literal(LiteralValue::String(
                    "small".to_string()
                ))),
            }
        );
    }

    #[test]
    fn test_unary_binds_tighter_than_multiplication() {
        let expr = parse_expression("-2 * 3").unwrap();
        assert_eq!(
            expr,
            ExpressionNode::BinaryOp {
                op: BinaryOperator::Multiply,
                left: Box::new(ExpressionNode::UnaryOp {
                    op: UnaryOperator::Minus,
                    operand: Box::new(literal_int(2)),
                }),
                right: Box::new(literal_int(3)),
            }
        );
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = parse_expression("1 + 2 extra").unwrap_err();
        assert!(matches!(err, ExprError::Parse { position: 6, .. }));
    }

    #[test]
    fn test_missing_operand() {
        assert!(parse_expression("1 +").is_err());
        assert!(parse_expression("(1 + 2").is_err());
    }
}
