//! Tokenizer for template expressions

use crate::error::{ExprError, Result};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::char,
    combinator::{recognize, value},
    sequence::preceded,
};
use rust_decimal::Decimal;
use std::fmt;

/// Token types in the template expression grammar
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Integer literal (e.g. 42)
    Integer(i64),
    /// Decimal literal (e.g. 3.14)
    Decimal(Decimal),
    /// String literal, single or double quoted
    String(String),
    /// Boolean literal
    Boolean(bool),
    /// Null literal
    Null,
    /// Identifier (property name)
    Identifier(String),
    /// Variable reference (`#name`)
    Variable(String),

    /// Addition operator (+)
    Plus,
    /// Subtraction operator (-)
    Minus,
    /// Multiplication operator (*)
    Star,
    /// Division operator (/)
    Slash,
    /// Remainder operator (%)
    Percent,
    /// Equality operator (==)
    Equal,
    /// Inequality operator (!=)
    NotEqual,
    /// Less than operator (<)
    LessThan,
    /// Less than or equal operator (<=)
    LessThanOrEqual,
    /// Greater than operator (>)
    GreaterThan,
    /// Greater than or equal operator (>=)
    GreaterThanOrEqual,
    /// Logical and operator (&&)
    And,
    /// Logical or operator (||)
    Or,
    /// Logical not operator (!)
    Bang,
    /// Ternary question mark (?)
    Question,
    /// Ternary colon (:)
    Colon,
    /// Property access dot (.)
    Dot,
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Left square bracket [
    LeftBracket,
    /// Right square bracket ]
    RightBracket,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(i) => write!(f, "{i}"),
            Token::Decimal(d) => write!(f, "{d}"),
            Token::String(s) => write!(f, "'{s}'"),
            Token::Boolean(b) => write!(f, "{b}"),
            Token::Null => f.write_str("null"),
            Token::Identifier(name) => f.write_str(name),
            Token::Variable(name) => write!(f, "#{name}"),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::Percent => f.write_str("%"),
            Token::Equal => f.write_str("=="),
            Token::NotEqual => f.write_str("!="),
            Token::LessThan => f.write_str("<"),
            Token::LessThanOrEqual => f.write_str("<="),
            Token::GreaterThan => f.write_str(">"),
            Token::GreaterThanOrEqual => f.write_str(">="),
            Token::And => f.write_str("&&"),
            Token::Or => f.write_str("||"),
            Token::Bang => f.write_str("!"),
            Token::Question => f.write_str("?"),
            Token::Colon => f.write_str(":"),
            Token::Dot => f.write_str("."),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
            Token::LeftBracket => f.write_str("["),
            Token::RightBracket => f.write_str("]"),
        }
    }
}

/// A token with its byte range in the source text
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    /// The wrapped value
    pub value: T,
    /// Start offset in the source
    pub start: usize,
    /// End offset in the source
    pub end: usize,
}

/// Tokenize a template expression
pub fn tokenize(input: &str) -> Result<Vec<Spanned<Token>>> {
    let mut tokens = Vec::new();
    let mut rest = input.trim_start();
    while !rest.is_empty() {
        let offset = input.len() - rest.len();
        let (next, token) = token(rest).map_err(|_| describe_failure(rest, offset))?;
        tokens.push(Spanned {
            value: token,
            start: offset,
            end: input.len() - next.len(),
        });
        rest = next.trim_start();
    }
    Ok(tokens)
}

fn describe_failure(rest: &str, offset: usize) -> ExprError {
    match rest.chars().next() {
        Some('\'' | '"') => ExprError::parse_error(offset, "unclosed string literal"),
        Some(c) => ExprError::parse_error(offset, format!("unexpected character '{c}'")),
        None => ExprError::parse_error(offset, "unexpected end of input"),
    }
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((
        token_number,
        token_string,
        token_variable,
        token_identifier_or_keyword,
        token_multi_char_op,
        token_single_char,
    ))
    .parse(input)
}

fn token_number(input: &str) -> IResult<&str, Token> {
    let (rest, text) = recognize((
        take_while1(|c: char| c.is_ascii_digit()),
        nom::combinator::opt((char('.'), take_while1(|c: char| c.is_ascii_digit()))),
    ))
    .parse(input)?;

    let token = if text.contains('.') {
        match text.parse::<Decimal>() {
            Ok(d) => Token::Decimal(d),
            Err(_) => return Err(nom_error(input, nom::error::ErrorKind::Float)),
        }
    } else {
        match text.parse::<i64>() {
            Ok(i) => Token::Integer(i),
            Err(_) => return Err(nom_error(input, nom::error::ErrorKind::Digit)),
        }
    };
    Ok((rest, token))
}

fn token_string(input: &str) -> IResult<&str, Token> {
    let (rest, text) = quoted_string(input)?;
    Ok((rest, Token::String(text)))
}

/// Parse a single- or double-quoted string with backslash escapes
///
/// Shared with the parameter macro grammar for quoted default values.
pub(crate) fn quoted_string(input: &str) -> IResult<&str, String> {
    let quote = match input.chars().next() {
        Some(c @ ('\'' | '"')) => c,
        _ => return Err(nom_error(input, nom::error::ErrorKind::Char)),
    };

    let mut out = String::new();
    let mut chars = input.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        if c == quote {
            return Ok((&input[i + c.len_utf8()..], out));
        }
        if c == '\\' {
            match chars.next() {
                Some((_, escaped)) => out.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                }),
                None => break,
            }
        } else {
            out.push(c);
        }
    }
    Err(nom::Err::Failure(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

fn token_variable(input: &str) -> IResult<&str, Token> {
    let (rest, name) = preceded(char('#'), identifier_text).parse(input)?;
    Ok((rest, Token::Variable(name.to_string())))
}

fn token_identifier_or_keyword(input: &str) -> IResult<&str, Token> {
    let (rest, ident) = identifier_text(input)?;
    let token = match ident {
        "true" => Token::Boolean(true),
        "false" => Token::Boolean(false),
        "null" => Token::Null,
        _ => Token::Identifier(ident.to_string()),
    };
    Ok((rest, token))
}

fn identifier_text(input: &str) -> IResult<&str, &str> {
    recognize((
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

fn token_multi_char_op(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::Equal, tag("==")),
        value(Token::NotEqual, tag("!=")),
        value(Token::LessThanOrEqual, tag("<=")),
        value(Token::GreaterThanOrEqual, tag(">=")),
        value(Token::And, tag("&&")),
        value(Token::Or, tag("||")),
    ))
    .parse(input)
}

fn token_single_char(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::Plus, char('+')),
        value(Token::Minus, char('-')),
        value(Token::Star, char('*')),
        value(Token::Slash, char('/')),
        value(Token::Percent, char('%')),
        value(Token::LessThan, char('<')),
        value(Token::GreaterThan, char('>')),
        value(Token::Bang, char('!')),
        value(Token::Question, char('?')),
        value(Token::Colon, char(':')),
        value(Token::Dot, char('.')),
        value(Token::LeftParen, char('(')),
        value(Token::RightParen, char(')')),
        value(Token::LeftBracket, char('[')),
        value(Token::RightBracket, char(']')),
    ))
    .parse(input)
}

fn nom_error(input: &str, kind: nom::error::ErrorKind) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(input, kind))
}
