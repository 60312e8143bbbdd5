//! Parameter macro expressions (the primary syntax)
//!
//! A parameter macro expression is either a bare parameter name
//! (`cache-name`) or text containing `{name}` / `{name default}`
//! references, optionally mixed with literal text (`near-{cache-name}`).
//! Anything outside this grammar is assumed to belong to the template
//! syntax instead, so every rejection here is an ordinary "no result",
//! never an error.
//!
//! Macro text is re-parsed on every evaluation by design: the parsed form
//! is tiny, and its meaning depends entirely on the resolver active at the
//! time of the call.

use crate::model::Value;
use crate::parser::quoted_string;
use crate::resolver::ParameterResolver;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{all_consuming, map, opt, recognize},
    sequence::{delimited, preceded},
};
use rust_decimal::Decimal;

/// Evaluate `raw` as a parameter macro expression against `resolver`
///
/// Returns `None` when the text is not a macro expression, or when a
/// referenced parameter is neither resolvable nor defaulted. A single
/// macro reference yields the parameter's typed value; a mix of literal
/// text and references concatenates into a string.
pub fn evaluate(raw: &str, resolver: &dyn ParameterResolver) -> Option<Value> {
    let segments = parse_macro_expression(raw)?;
    match segments.as_slice() {
        [Segment::Macro { name, default }] => resolve(name, default.as_ref(), resolver),
        segments => {
            let mut out = String::new();
            for segment in segments {
                match segment {
                    Segment::Literal(text) => out.push_str(text),
                    Segment::Macro { name, default } => {
                        out.push_str(&resolve(name, default.as_ref(), resolver)?.to_string());
                    }
                }
            }
            Some(Value::String(out))
        }
    }
}

/// Whether `raw` is inside the macro grammar at all, resolver aside
///
/// Used to decide if a text that the template grammar cannot parse is
/// still a legitimate expression under this syntax.
pub(crate) fn accepts(raw: &str) -> bool {
    parse_macro_expression(raw).is_some()
}

fn resolve(
    name: &str,
    default: Option<&Value>,
    resolver: &dyn ParameterResolver,
) -> Option<Value> {
    match resolver.resolve(name) {
        Some(value) => Some(value),
        None => {
            log::trace!("parameter '{name}' not resolved");
            default.cloned()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Macro { name: String, default: Option<Value> },
}

/// Parse macro text into literal and reference segments
///
/// `None` means the text is outside the macro grammar entirely.
fn parse_macro_expression(raw: &str) -> Option<Vec<Segment>> {
    if raw.is_empty() {
        return None;
    }

    // Without braces the whole text must be one parameter name
    if !raw.contains(['{', '}']) {
        let (_, name) = all_consuming(parameter_name).parse(raw).ok()?;
        return Some(vec![Segment::Macro {
            name: name.to_string(),
            default: None,
        }]);
    }

    let mut segments = Vec::new();
    let mut rest = raw;
    while !rest.is_empty() {
        if rest.starts_with('{') {
            let (next, segment) = macro_ref(rest).ok()?;
            segments.push(segment);
            rest = next;
        } else if rest.starts_with('}') {
            // Unbalanced closing brace
            return None;
        } else {
            let end = rest.find(['{', '}']).unwrap_or(rest.len());
            segments.push(Segment::Literal(rest[..end].to_string()));
            rest = &rest[end..];
        }
    }
    Some(segments)
}

fn macro_ref(input: &str) -> IResult<&str, Segment> {
    let (rest, (name, default)) = delimited(
        char('{'),
        (parameter_name, opt(preceded(char(' '), default_literal))),
        char('}'),
    )
    .parse(input)?;
    Ok((
        rest,
        Segment::Macro {
            name: name.to_string(),
            default,
        },
    ))
}

fn parameter_name(input: &str) -> IResult<&str, &str> {
    recognize((
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')),
    ))
    .parse(input)
}

fn default_literal(input: &str) -> IResult<&str, Value> {
    alt((
        map(quoted_string, Value::String),
        map(
            take_while1(|c: char| !matches!(c, '{' | '}' | ' ')),
            scalar_value,
        ),
    ))
    .parse(input)
}

/// Interpret an unquoted default as the most specific scalar it spells
fn scalar_value(text: &str) -> Value {
    if let Ok(i) = text.parse::<i64>() {
        Value::Integer(i)
    } else if let Ok(d) = text.parse::<Decimal>() {
        Value::Decimal(d)
    } else {
        match text {
            "true" => Value::Boolean(true),
            "false" => Value::Boolean(false),
            _ => Value::String(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{MapResolver, NullParameterResolver};
    use rstest::rstest;

    fn resolver() -> MapResolver {
        MapResolver::new()
            .with_parameter("cache-name", "orders")
            .with_parameter("back-size-limit", 10)
    }

    #[test]
    fn test_bare_name_resolves() {
        assert_eq!(
            evaluate("cache-name", &resolver()),
            Some(Value::String("orders".to_string()))
        );
    }

    #[test]
    fn test_braced_reference_resolves_typed() {
        assert_eq!(
            evaluate("{back-size-limit}", &resolver()),
            Some(Value::Integer(10))
        );
    }

    #[test]
    fn test_embedded_macro_concatenates() {
        assert_eq!(
            evaluate("near-{cache-name}", &resolver()),
            Some(Value::String("near-orders".to_string()))
        );
        assert_eq!(
            evaluate("{cache-name}-{back-size-limit}", &resolver()),
            Some(Value::String("orders-10".to_string()))
        );
    }

    #[rstest]
    #[case("{timeout 30}", Value::Integer(30))]
    #[case("{ratio 0.5}", Value::Decimal("0.5".parse().unwrap()))]
    #[case("{flag true}", Value::Boolean(true))]
    #[case("{label spare}", Value::String("spare".to_string()))]
    #[case("{label 'two words'}", Value::String("two words".to_string()))]
    fn test_defaults_used_when_unresolved(#[case] raw: &str, #[case] expected: Value) {
        assert_eq!(evaluate(raw, &NullParameterResolver), Some(expected));
    }

    #[test]
    fn test_resolved_value_wins_over_default() {
        assert_eq!(
            evaluate("{cache-name fallback}", &resolver()),
            Some(Value::String("orders".to_string()))
        );
    }

    #[rstest]
    #[case("")]
    #[case("1 + 1")]
    #[case("not a name")]
    #[case("{1 + 1}")]
    #[case("{unclosed")]
    #[case("closed}")]
    #[case("{nested {inner}}")]
    #[case("{}")]
    fn test_outside_grammar_yields_no_result(#[case] raw: &str) {
        assert_eq!(evaluate(raw, &resolver()), None);
    }

    #[test]
    fn test_unresolved_without_default_yields_no_result() {
        assert_eq!(evaluate("front-size-limit", &resolver()), None);
        assert_eq!(evaluate("near-{front-size-limit}", &resolver()), None);
    }

    #[test]
    fn test_reevaluation_tracks_resolver_state() {
        let raw = "cache-name";
        assert_eq!(evaluate(raw, &NullParameterResolver), None);
        assert_eq!(
            evaluate(raw, &resolver()),
            Some(Value::String("orders".to_string()))
        );
    }
}
