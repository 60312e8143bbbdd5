//! Template scanning: literal text interleaved with `#{...}` expressions

use super::pratt::parse_expression;
use crate::ast::{ExpressionNode, LiteralValue};
use crate::error::{ExprError, Result};

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    /// Literal text outside any expression marker
    Literal(String),
    /// A parsed `#{...}` expression
    Expression(ExpressionNode),
}

/// A parsed template: the secondary, eagerly-parsed form of an expression
///
/// Parsed once when the owning [`DelegatingExpression`] is constructed and
/// evaluated many times. A template consisting of a single expression span
/// evaluates to that expression's typed value; anything else concatenates
/// its parts into a string.
///
/// [`DelegatingExpression`]: crate::engine::DelegatingExpression
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateExpression {
    parts: Vec<TemplatePart>,
}

impl TemplateExpression {
    /// The scanned parts, in source order
    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }
}

/// Parse template text into literal runs and `#{...}` expression spans
///
/// An empty expression span (`#{}`) parses as the null literal, so wrapping
/// arbitrary raw text, including the empty string, always yields a valid
/// template. Parse errors inside a span carry positions relative to the
/// whole template text.
pub fn parse_template(text: &str) -> Result<TemplateExpression> {
    let mut parts = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let offset = text.len() - rest.len();
        match rest.find("#{") {
            Some(0) => {
                let inner_start = offset + 2;
                let close = find_closing_brace(&rest[2..])
                    .ok_or_else(|| ExprError::parse_error(offset, "unclosed '#{' expression"))?;
                let inner = &rest[2..2 + close];
                parts.push(TemplatePart::Expression(parse_span(inner, inner_start)?));
                rest = &rest[2 + close + 1..];
            }
            Some(next) => {
                parts.push(TemplatePart::Literal(rest[..next].to_string()));
                rest = &rest[next..];
            }
            None => {
                parts.push(TemplatePart::Literal(rest.to_string()));
                rest = "";
            }
        }
    }

    Ok(TemplateExpression { parts })
}

fn parse_span(inner: &str, inner_start: usize) -> Result<ExpressionNode> {
    if inner.trim().is_empty() {
        return Ok(ExpressionNode::Literal(LiteralValue::Null));
    }
    parse_expression(inner).map_err(|err| match err {
        ExprError::Parse { position, message } => ExprError::Parse {
            position: position + inner_start,
            message,
        },
        other => other,
    })
}

/// Find the `}` that closes an expression span, skipping quoted strings
fn find_closing_brace(text: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                '}' => return Some(i),
                _ => {}
            },
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOperator;

    #[test]
    fn test_single_expression_span() {
        let template = parse_template("#{1 + 1}").unwrap();
        assert_eq!(template.parts().len(), 1);
        assert!(matches!(
            template.parts()[0],
            TemplatePart::Expression(ExpressionNode::BinaryOp {
                op: BinaryOperator::Add,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_span_is_null_literal() {
        let template = parse_template("#{}").unwrap();
        assert_eq!(
            template.parts(),
            &[TemplatePart::Expression(ExpressionNode::Literal(
                LiteralValue::Null
            ))]
        );
    }

    #[test]
    fn test_mixed_literal_and_expressions() {
        let template = parse_template("cache-#{#region}-store").unwrap();
        assert_eq!(template.parts().len(), 3);
        assert_eq!(
            template.parts()[0],
            TemplatePart::Literal("cache-".to_string())
        );
        assert_eq!(
            template.parts()[2],
            TemplatePart::Literal("-store".to_string())
        );
    }

    #[test]
    fn test_brace_inside_string_does_not_close_span() {
        let template = parse_template("#{'a}b'}").unwrap();
        assert_eq!(
            template.parts(),
            &[TemplatePart::Expression(ExpressionNode::Literal(
                LiteralValue::String("a}b".to_string())
            ))]
        );
    }

    #[test]
    fn test_unclosed_span() {
        let err = parse_template("#{1 + 1").unwrap_err();
        assert_eq!(err, ExprError::parse_error(0, "unclosed '#{' expression"));
    }

    #[test]
    fn test_error_position_is_template_relative() {
        // The bad token sits at offset 5 of the template text
        let err = parse_template("#{1 +&}").unwrap_err();
        assert!(matches!(err, ExprError::Parse { position: 5, .. }));
    }

    #[test]
    fn test_plain_text_is_a_single_literal() {
        let template = parse_template("no expressions here").unwrap();
        assert_eq!(
            template.parts(),
            &[TemplatePart::Literal("no expressions here".to_string())]
        );
    }
}
