//! Type mapping definitions
//!
//! This module provides the runtime column value and the storage types a field can
//! be declared with.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single column value as bound into a statement or read back from a row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::Text(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::Text(val.to_string())
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Boolean(val)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(val: $ty) -> Self {
                    Value::Integer(val as i64)
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(val: f32) -> Self {
        Value::Float(val as f64)
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::Float(val)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Storage type of a mapped column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoredType {
    String,
    Boolean,
    Integer,
    Float,
    Text,
}

impl StoredType {
    /// Column DDL used when a field does not declare its own.
    ///
    /// Booleans are declared `tinyint(1)`: MySQL's own spelling of `boolean`, and an
    /// integer column on SQLite, whose `boolean` columns the `Any` driver cannot read.
    /// Postgres tables keep a native `boolean` column, declared with `ddl`.
    pub fn default_ddl(&self) -> &'static str {
        match self {
            StoredType::String => "varchar(100)",
            StoredType::Boolean => "tinyint(1)",
            StoredType::Integer => "bigint",
            StoredType::Float => "real",
            StoredType::Text => "text",
        }
    }

    /// Default value a field of this type carries unless declared otherwise
    pub fn implicit_default(&self) -> Option<Value> {
        match self {
            StoredType::Boolean => Some(Value::Boolean(false)),
            StoredType::Integer => Some(Value::Integer(0)),
            StoredType::Float => Some(Value::Float(0.0)),
            StoredType::String | StoredType::Text => None,
        }
    }

    /// Normalize a value read from a driver into this storage type.
    ///
    /// Drivers disagree on how booleans and integral floats come back (MySQL `tinyint`,
    /// SQLite integer affinity), so values are converted when the conversion is lossless
    /// and passed through untouched otherwise.
    pub fn coerce(&self, value: Value) -> Value {
        match (self, value) {
            (_, Value::Null) => Value::Null,
            (StoredType::Boolean, Value::Integer(i)) => Value::Boolean(i != 0),
            (StoredType::Boolean, Value::Text(s)) => match s.as_str() {
                "1" | "true" | "TRUE" => Value::Boolean(true),
                "0" | "false" | "FALSE" => Value::Boolean(false),
                _ => Value::Text(s),
            },
            (StoredType::Integer, Value::Boolean(b)) => Value::Integer(b as i64),
            (StoredType::Integer, Value::Float(f)) if f.fract() == 0.0 => Value::Integer(f as i64),
            (StoredType::Integer, Value::Text(s)) => match s.parse::<i64>() {
                Ok(i) => Value::Integer(i),
                Err(_) => Value::Text(s),
            },
            (StoredType::Float, Value::Integer(i)) => Value::Float(i as f64),
            (StoredType::Float, Value::Text(s)) => match s.parse::<f64>() {
                Ok(f) => Value::Float(f),
                Err(_) => Value::Text(s),
            },
            (StoredType::String | StoredType::Text, Value::Integer(i)) => Value::Text(i.to_string()),
            (StoredType::String | StoredType::Text, Value::Float(f)) => Value::Text(f.to_string()),
            (_, other) => other,
        }
    }
}

impl fmt::Display for StoredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoredType::String => "string",
            StoredType::Boolean => "boolean",
            StoredType::Integer => "integer",
            StoredType::Float => "float",
            StoredType::Text => "text",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for StoredType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Ok(StoredType::String),
            "boolean" | "bool" => Ok(StoredType::Boolean),
            "integer" | "int" => Ok(StoredType::Integer),
            "float" => Ok(StoredType::Float),
            "text" => Ok(StoredType::Text),
            other => Err(format!(
                "unknown storage type '{}': expected string, boolean, integer, float or text",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_from_integer_storage() {
        assert_eq!(StoredType::Boolean.coerce(Value::Integer(1)), Value::Boolean(true));
        assert_eq!(StoredType::Boolean.coerce(Value::Integer(0)), Value::Boolean(false));
    }

    #[test]
    fn test_float_from_integral_storage() {
        assert_eq!(StoredType::Float.coerce(Value::Integer(3)), Value::Float(3.0));
    }

    #[test]
    fn test_lossy_conversions_pass_through() {
        assert_eq!(StoredType::Integer.coerce(Value::Float(1.5)), Value::Float(1.5));
        assert_eq!(
            StoredType::Integer.coerce(Value::Text("abc".into())),
            Value::Text("abc".into())
        );
    }

    #[test]
    fn test_null_is_preserved_for_every_type() {
        for ty in [
            StoredType::String,
            StoredType::Boolean,
            StoredType::Integer,
            StoredType::Float,
            StoredType::Text,
        ] {
            assert_eq!(ty.coerce(Value::Null), Value::Null);
        }
    }

    #[test]
    fn test_parse_stored_type() {
        assert_eq!("text".parse::<StoredType>(), Ok(StoredType::Text));
        assert_eq!("Bool".parse::<StoredType>(), Ok(StoredType::Boolean));
        assert!("blob".parse::<StoredType>().is_err());
    }

    #[test]
    fn test_implicit_defaults() {
        assert_eq!(StoredType::Integer.implicit_default(), Some(Value::Integer(0)));
        assert_eq!(StoredType::Float.implicit_default(), Some(Value::Float(0.0)));
        assert_eq!(StoredType::Boolean.implicit_default(), Some(Value::Boolean(false)));
        assert_eq!(StoredType::String.implicit_default(), None);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }
}
