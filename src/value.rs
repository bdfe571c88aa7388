use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Represents a single data value stored in a row.
///
/// The engine is schemaless: a value's type is decided by the shape of the
/// token it was built from, never by a declared column type. `Null` is the
/// sentinel produced when a projection asks for a column a row does not have;
/// no token ever coerces to it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Represents an empty or missing value.
    Null,
    /// A 64-bit signed integer value.
    Int(i64),
    /// A UTF-8 string value.
    Text(String),
}

impl Value {
    /// Builds a [Value] from a raw query token.
    ///
    /// A token consisting only of decimal digits becomes [Value::Int];
    /// anything else becomes [Value::Text] with one pair of surrounding
    /// quote characters stripped. An all-digit token too large for `i64`
    /// falls back to text.
    ///
    /// # Example
    /// ```
    /// # use minisql::Value;
    /// assert_eq!(Value::coerce("42"), Value::Int(42));
    /// assert_eq!(Value::coerce("'Alice'"), Value::Text("Alice".into()));
    /// assert_eq!(Value::coerce("4x2"), Value::Text("4x2".into()));
    /// ```
    pub fn coerce(token: &str) -> Self {
        let token = unquote(token);
        if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(n) = token.parse::<i64>() {
                return Self::Int(n);
            }
        }
        Self::Text(token.to_string())
    }

    /// Returns `true` if the value is [Value::Null].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the inner integer value if this is a [Value::Int].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns a reference to the inner string slice if this is a [Value::Text].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Strips one pair of matching surrounding quote characters, if present.
pub(crate) fn unquote(token: &str) -> &str {
    let token = token.trim();
    for quote in ['\'', '"'] {
        if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
            return &token[1..token.len() - 1];
        }
    }
    token
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Int(i) => write!(f, "{}", i),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

// On disk a value is a bare JSON number, string or null, so a table document
// stays a plain array of flat objects that any JSON tool can read.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer, a string or null")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
                Ok(Value::Int(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
                i64::try_from(v)
                    .map(Value::Int)
                    .map_err(|_| E::custom(format!("integer {} out of range", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
                Ok(Value::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
                Ok(Value::Text(v))
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
