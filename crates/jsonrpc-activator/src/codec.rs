//! Value-type descriptors and the codec that checks wire values against them.
//!
//! Every declared parameter and every non-void return value carries a
//! [`ValueType`]. The dispatcher hands each wire value to a [`ValueCodec`]
//! together with its descriptor; a decode failure is reported as
//! `Invalid params`, an encode failure as `Internal error`.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Closed set of value shapes a parameter or return value may declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// Any JSON value, passed through untouched
    Any,
    Boolean,
    /// Integral number representable as `i64` or `u64`
    Integer,
    /// Any JSON number
    Number,
    String,
    /// JSON array whose items all have the given type
    ArrayOf(Box<ValueType>),
    /// JSON object whose values all have the given type
    ObjectOf(Box<ValueType>),
    /// The given type or `null`
    Optional(Box<ValueType>),
}

impl ValueType {
    pub fn array_of(item: ValueType) -> Self {
        ValueType::ArrayOf(Box::new(item))
    }

    pub fn object_of(value: ValueType) -> Self {
        ValueType::ObjectOf(Box::new(value))
    }

    pub fn optional(inner: ValueType) -> Self {
        ValueType::Optional(Box::new(inner))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Any => write!(f, "any"),
            ValueType::Boolean => write!(f, "boolean"),
            ValueType::Integer => write!(f, "integer"),
            ValueType::Number => write!(f, "number"),
            ValueType::String => write!(f, "string"),
            ValueType::ArrayOf(item) => write!(f, "array<{}>", item),
            ValueType::ObjectOf(value) => write!(f, "object<{}>", value),
            ValueType::Optional(inner) => write!(f, "optional<{}>", inner),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("expected {expected} at {path}, found {found}")]
    TypeMismatch {
        expected: String,
        found: &'static str,
        path: String,
    },

    #[error("value could not be serialized: {0}")]
    Serialization(String),
}

/// Decodes wire values into call arguments and encodes return values.
///
/// Implementations must be pure: the same input always gives the same output.
pub trait ValueCodec: Send + Sync {
    fn decode(&self, value: &Value, ty: &ValueType) -> Result<Value, CodecError>;

    fn encode(&self, value: Value, ty: &ValueType) -> Result<Value, CodecError>;
}

/// Default codec: no coercion, a value either has the declared shape or is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictCodec;

impl StrictCodec {
    fn check(value: &Value, ty: &ValueType, path: &str) -> Result<(), CodecError> {
        let matches = match (ty, value) {
            (ValueType::Any, _) => true,
            (ValueType::Optional(_), Value::Null) => true,
            (ValueType::Optional(inner), _) => return Self::check(value, inner, path),
            (ValueType::Boolean, Value::Bool(_)) => true,
            (ValueType::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (ValueType::Number, Value::Number(_)) => true,
            (ValueType::String, Value::String(_)) => true,
            (ValueType::ArrayOf(item), Value::Array(items)) => {
                for (index, value) in items.iter().enumerate() {
                    Self::check(value, item, &format!("{}[{}]", path, index))?;
                }
                true
            }
            (ValueType::ObjectOf(inner), Value::Object(map)) => {
                for (key, value) in map {
                    Self::check(value, inner, &format!("{}.{}", path, key))?;
                }
                true
            }
            _ => false,
        };

        if matches {
            Ok(())
        } else {
            Err(CodecError::TypeMismatch {
                expected: ty.to_string(),
                found: kind_of(value),
                path: path.to_string(),
            })
        }
    }
}

impl ValueCodec for StrictCodec {
    fn decode(&self, value: &Value, ty: &ValueType) -> Result<Value, CodecError> {
        Self::check(value, ty, "$")?;
        Ok(value.clone())
    }

    fn encode(&self, value: Value, ty: &ValueType) -> Result<Value, CodecError> {
        Self::check(&value, ty, "$")?;
        Ok(value)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Serialize a host value for encoding.
pub(crate) fn to_wire<T: serde::Serialize>(value: T) -> Result<Value, CodecError> {
    serde_json::to_value(value).map_err(|e| CodecError::Serialization(e.to_string()))
}
