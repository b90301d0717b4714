use std::fmt;

use serde::Serialize;
use serde_json::{Number, Value};

/// Identifier a client attaches to a request.
///
/// Echoed verbatim in the response. Numbers keep their wire form, so a
/// `u64` or fractional id comes back exactly as sent. `Null` is what failure
/// responses carry when the request's own id could not be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(Number),
    Null,
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{}", s),
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n.into())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        RequestId::String(s)
    }
}

impl RequestId {
    /// Read an id from its wire form. Only strings, numbers and null are ids.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(RequestId::String(s.clone())),
            Value::Number(n) => Some(RequestId::Number(n.clone())),
            Value::Null => Some(RequestId::Null),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RequestId::Null)
    }
}

/// JSON-RPC version
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JsonRpcVersion {
    #[default]
    V2_0,
}

impl JsonRpcVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonRpcVersion::V2_0 => crate::JSONRPC_VERSION,
        }
    }

    /// Accepts only the exact string `"2.0"`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value.as_str() {
            Some(crate::JSONRPC_VERSION) => Some(JsonRpcVersion::V2_0),
            _ => None,
        }
    }
}

impl fmt::Display for JsonRpcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for JsonRpcVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
