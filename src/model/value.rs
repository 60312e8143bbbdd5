//! Core value type for evaluated configuration expressions

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use std::fmt;

/// A value produced by evaluating a configuration expression
///
/// Both expression syntaxes produce values of this type: parameter macros
/// resolve to whatever the resolver holds, template expressions compute
/// them. Object values keep their JSON representation and convert members
/// on access.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Boolean(bool),

    /// Integer value (64-bit signed)
    Integer(i64),

    /// Decimal value with arbitrary precision
    Decimal(Decimal),

    /// String value
    String(String),

    /// Ordered sequence of values
    Array(Vec<Value>),

    /// Structured object, kept in its JSON form
    Object(serde_json::Map<String, JsonValue>),

    /// Absent value
    Null,
}

impl Value {
    /// Name of this value's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Null => "null",
        }
    }

    /// Check if this is the null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Look up a member of an object value
    ///
    /// Returns `None` for non-object values and missing keys alike.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(map) => map.get(key).cloned().map(Value::from),
            _ => None,
        }
    }

    /// Look up an element of an array value by index
    pub fn index(&self, index: usize) -> Option<Value> {
        match self {
            Value::Array(items) => items.get(index).cloned(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Render the value as configuration text
    ///
    /// Null renders as the empty string so that template concatenation of
    /// an absent value degrades gracefully.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::String(s) => f.write_str(s),
            Value::Array(_) | Value::Object(_) => {
                write!(f, "{}", JsonValue::from(self.clone()))
            }
            Value::Null => Ok(()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Decimal(d) => Serialize::serialize(d, serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Object(map) => map.serialize(serializer),
            Value::Null => serializer.serialize_unit(),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                // Preserve precision by going through the decimal text form
                None => n
                    .to_string()
                    .parse::<Decimal>()
                    .map_or(Value::Null, Value::Decimal),
            },
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Object(map),
        }
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Boolean(b) => JsonValue::Bool(b),
            Value::Integer(i) => JsonValue::from(i),
            Value::Decimal(d) => d
                .to_f64()
                .and_then(serde_json::Number::from_f64)
                .map_or(JsonValue::Null, JsonValue::Number),
            Value::String(s) => JsonValue::String(s),
            Value::Array(items) => JsonValue::Array(items.into_iter().map(JsonValue::from).collect()),
            Value::Object(map) => JsonValue::Object(map),
            Value::Null => JsonValue::Null,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_round_trip() {
        let json = json!({"name": "orders", "size": 10, "nested": {"deep": true}});
        let value = Value::from(json.clone());
        assert_eq!(value.get("name"), Some(Value::String("orders".to_string())));
        assert_eq!(value.get("size"), Some(Value::Integer(10)));
        assert_eq!(
            value.get("nested").and_then(|n| n.get("deep")),
            Some(Value::Boolean(true))
        );
        assert_eq!(JsonValue::from(value), json);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::String("orders".to_string()).to_string(), "orders");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(
            Value::Decimal("2.5".parse().unwrap()).to_string(),
            "2.5"
        );
    }

    #[test]
    fn test_large_number_becomes_decimal() {
        let json = json!(18446744073709551615u64);
        match Value::from(json) {
            Value::Decimal(d) => assert_eq!(d.to_string(), "18446744073709551615"),
            other => panic!("expected decimal, got {other:?}"),
        }
    }

    #[test]
    fn test_member_access_on_non_object() {
        assert_eq!(Value::Integer(1).get("anything"), None);
        assert_eq!(Value::Null.get("anything"), None);
    }
}
