//! Typed extraction from evaluated values

use super::value::Value;
use crate::error::{ExprError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Conversion from a [`Value`] into a concrete Rust type
///
/// The typed evaluation entry points use this trait to coerce whatever an
/// expression produced into the type the caller asked for. Widenings that
/// preserve meaning are permitted (integer to decimal, numeric text to a
/// number); anything lossy or nonsensical yields [`ExprError::Conversion`].
pub trait FromValue: Sized {
    /// Convert an evaluated value into this type
    fn from_value(value: Value) -> Result<Self>;

    /// Name of the target type, used in error messages
    fn type_name() -> &'static str;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }

    fn type_name() -> &'static str {
        "value"
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(b) => Ok(b),
            Value::Integer(0) => Ok(false),
            Value::Integer(1) => Ok(true),
            Value::String(s) if s == "true" => Ok(true),
            Value::String(s) if s == "false" => Ok(false),
            other => Err(conversion(&other, Self::type_name())),
        }
    }

    fn type_name() -> &'static str {
        "boolean"
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Ok(i),
            Value::Decimal(d) if d.fract().is_zero() => {
                d.to_i64().ok_or_else(|| conversion_name("decimal", Self::type_name()))
            }
            Value::String(s) => s
                .parse::<i64>()
                .map_err(|_| conversion_name("string", Self::type_name())),
            other => Err(conversion(&other, Self::type_name())),
        }
    }

    fn type_name() -> &'static str {
        "integer"
    }
}

impl FromValue for Decimal {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(d) => Ok(d),
            Value::Integer(i) => Ok(Decimal::from(i)),
            Value::String(s) => s
                .parse::<Decimal>()
                .map_err(|_| conversion_name("string", Self::type_name())),
            other => Err(conversion(&other, Self::type_name())),
        }
    }

    fn type_name() -> &'static str {
        "decimal"
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Ok(i as f64),
            Value::Decimal(d) => d
                .to_f64()
                .ok_or_else(|| conversion_name("decimal", Self::type_name())),
            Value::String(s) => s
                .parse::<f64>()
                .map_err(|_| conversion_name("string", Self::type_name())),
            other => Err(conversion(&other, Self::type_name())),
        }
    }

    fn type_name() -> &'static str {
        "float"
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            Value::Boolean(_) | Value::Integer(_) | Value::Decimal(_) => Ok(value.to_string()),
            other => Err(conversion(&other, Self::type_name())),
        }
    }

    fn type_name() -> &'static str {
        "string"
    }
}

fn conversion(value: &Value, to: &str) -> ExprError {
    ExprError::conversion_error(value.type_name(), to)
}

fn conversion_name(from: &str, to: &str) -> ExprError {
    ExprError::conversion_error(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Integer(8080), 8080)]
    #[case(Value::String("8080".to_string()), 8080)]
    #[case(Value::Decimal(Decimal::from(42)), 42)]
    fn test_integer_coercion(#[case] value: Value, #[case] expected: i64) {
        assert_eq!(i64::from_value(value).unwrap(), expected);
    }

    #[test]
    fn test_fractional_decimal_does_not_coerce_to_integer() {
        let value = Value::Decimal("42.5".parse().unwrap());
        assert!(i64::from_value(value).is_err());
    }

    #[rstest]
    #[case(Value::Boolean(true), true)]
    #[case(Value::Integer(1), true)]
    #[case(Value::Integer(0), false)]
    #[case(Value::String("true".to_string()), true)]
    fn test_boolean_coercion(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(bool::from_value(value).unwrap(), expected);
    }

    #[test]
    fn test_boolean_rejects_arbitrary_text() {
        assert!(bool::from_value(Value::String("orders".to_string())).is_err());
    }

    #[test]
    fn test_string_from_scalars() {
        assert_eq!(String::from_value(Value::Integer(30)).unwrap(), "30");
        assert_eq!(String::from_value(Value::Boolean(true)).unwrap(), "true");
        assert!(String::from_value(Value::Null).is_err());
    }

    #[test]
    fn test_identity() {
        let value = Value::String("x".to_string());
        assert_eq!(Value::from_value(value.clone()).unwrap(), value);
    }
}
