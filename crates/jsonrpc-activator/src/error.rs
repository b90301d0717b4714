use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::types::{JsonRpcVersion, RequestId};

/// JSON-RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    /// Any code assigned by the application, including the -32000..-32099 server range
    Application(i64),
}

impl JsonRpcErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            JsonRpcErrorCode::ParseError => crate::error_codes::PARSE_ERROR,
            JsonRpcErrorCode::InvalidRequest => crate::error_codes::INVALID_REQUEST,
            JsonRpcErrorCode::MethodNotFound => crate::error_codes::METHOD_NOT_FOUND,
            JsonRpcErrorCode::InvalidParams => crate::error_codes::INVALID_PARAMS,
            JsonRpcErrorCode::InternalError => crate::error_codes::INTERNAL_ERROR,
            JsonRpcErrorCode::Application(code) => *code,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JsonRpcErrorCode::ParseError => "Parse error",
            JsonRpcErrorCode::InvalidRequest => "Invalid Request",
            JsonRpcErrorCode::MethodNotFound => "Method not found",
            JsonRpcErrorCode::InvalidParams => "Invalid params",
            JsonRpcErrorCode::InternalError => "Internal error",
            JsonRpcErrorCode::Application(_) => "Server error",
        }
    }

    /// Whether `code` lies in the range reserved for implementation-defined server errors.
    pub fn is_server_range(code: i64) -> bool {
        (crate::error_codes::SERVER_ERROR_START..=crate::error_codes::SERVER_ERROR_END)
            .contains(&code)
    }
}

impl From<i64> for JsonRpcErrorCode {
    fn from(code: i64) -> Self {
        match code {
            crate::error_codes::PARSE_ERROR => JsonRpcErrorCode::ParseError,
            crate::error_codes::INVALID_REQUEST => JsonRpcErrorCode::InvalidRequest,
            crate::error_codes::METHOD_NOT_FOUND => JsonRpcErrorCode::MethodNotFound,
            crate::error_codes::INVALID_PARAMS => JsonRpcErrorCode::InvalidParams,
            crate::error_codes::INTERNAL_ERROR => JsonRpcErrorCode::InternalError,
            other => JsonRpcErrorCode::Application(other),
        }
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// JSON-RPC Error object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorObject {
    pub fn new(code: JsonRpcErrorCode, message: Option<String>, data: Option<Value>) -> Self {
        Self {
            code: code.code(),
            message: message.unwrap_or_else(|| code.message().to_string()),
            data,
        }
    }

    /// An application error with an explicit code, message and optional data.
    pub fn custom(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }

    pub fn parse_error(data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::ParseError, None, data)
    }

    pub fn invalid_request(data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::InvalidRequest, None, data)
    }

    pub fn method_not_found() -> Self {
        Self::new(JsonRpcErrorCode::MethodNotFound, None, None)
    }

    pub fn invalid_params(data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::InvalidParams, None, data)
    }

    /// Always the fixed message and never any data.
    pub fn internal_error() -> Self {
        Self::new(JsonRpcErrorCode::InternalError, None, None)
    }
}

impl fmt::Display for JsonRpcErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// JSON-RPC Error response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcError {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub id: RequestId,
    pub error: JsonRpcErrorObject,
}

impl JsonRpcError {
    pub fn new(id: RequestId, error: JsonRpcErrorObject) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id,
            error,
        }
    }

    pub fn parse_error(data: Option<Value>) -> Self {
        Self::new(RequestId::Null, JsonRpcErrorObject::parse_error(data))
    }

    pub fn invalid_request(data: Option<Value>) -> Self {
        Self::new(RequestId::Null, JsonRpcErrorObject::invalid_request(data))
    }

    pub fn method_not_found(id: RequestId) -> Self {
        Self::new(id, JsonRpcErrorObject::method_not_found())
    }

    pub fn invalid_params(id: RequestId, data: Option<Value>) -> Self {
        Self::new(id, JsonRpcErrorObject::invalid_params(data))
    }

    pub fn internal_error(id: RequestId) -> Self {
        Self::new(id, JsonRpcErrorObject::internal_error())
    }
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JSON-RPC Error {}: {}",
            self.error.code, self.error.message
        )
    }
}

impl std::error::Error for JsonRpcError {}

/// Configuration mistakes caught while building a dispatcher. Fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("method '{0}' is registered more than once")]
    DuplicateMethod(String),

    #[error("duplicate error mapping for kind {kind} at {scope} level")]
    DuplicateMappingRule { kind: String, scope: &'static str },

    #[error("method '{0}' has no handler")]
    MissingHandler(String),

    #[error("method '{0}' accepts no params shape")]
    NoParamsShape(String),

    #[error("method '{method}' accepts named params but parameter #{index} has no name")]
    UnnamedParameter { method: String, index: usize },

    #[error("method '{method}' declares parameter '{name}' more than once")]
    DuplicateParameter { method: String, name: String },

    #[error("method '{0}' accepts missing params but declares parameters")]
    MissingShapeWithParameters(String),
}

/// Builds the optional `data` member of protocol errors.
///
/// Disabled by default. When enabled, parse, envelope and params failures
/// carry a short diagnostic; internal errors never do.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorDataFactory {
    enabled: bool,
}

impl ErrorDataFactory {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn create(&self, message: &str, cause: Option<&dyn fmt::Display>) -> Option<Value> {
        if !self.enabled {
            return None;
        }
        let mut data = Map::new();
        data.insert("message".to_string(), Value::String(message.to_string()));
        if let Some(cause) = cause {
            data.insert("cause".to_string(), Value::String(cause.to_string()));
        }
        Some(Value::Object(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_codes() {
        assert_eq!(JsonRpcErrorCode::ParseError.code(), -32700);
        assert_eq!(JsonRpcErrorCode::InvalidRequest.code(), -32600);
        assert_eq!(JsonRpcErrorCode::MethodNotFound.code(), -32601);
        assert_eq!(JsonRpcErrorCode::InvalidParams.code(), -32602);
        assert_eq!(JsonRpcErrorCode::InternalError.code(), -32603);
        assert_eq!(JsonRpcErrorCode::from(33000), JsonRpcErrorCode::Application(33000));
        assert!(JsonRpcErrorCode::is_server_range(-32099));
        assert!(!JsonRpcErrorCode::is_server_range(32000));
    }

    #[test]
    fn test_error_serialization() {
        let error = JsonRpcError::method_not_found(RequestId::from("1"));
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(
            json,
            r#"{"jsonrpc":"2.0","id":"1","error":{"code":-32601,"message":"Method not found"}}"#
        );
    }

    #[test]
    fn test_custom_error_keeps_data() {
        let error = JsonRpcError::new(
            RequestId::from(1),
            JsonRpcErrorObject::custom(-32099, "custom", Some(json!({"field": "value"}))),
        );
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["error"]["data"]["field"], "value");
        assert_eq!(json["error"]["code"], -32099);
    }

    #[test]
    fn test_envelope_errors_use_null_id() {
        let json = serde_json::to_string(&JsonRpcError::parse_error(None)).unwrap();
        assert_eq!(
            json,
            r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32700,"message":"Parse error"}}"#
        );
    }

    #[test]
    fn test_error_data_factory() {
        let disabled = ErrorDataFactory::default();
        assert_eq!(disabled.create("Request batch cannot be empty", None), None);

        let enabled = ErrorDataFactory::new(true);
        let cause = "expected value at line 1 column 1";
        let data = enabled.create("Parsing of message failed", Some(&cause)).unwrap();
        assert_eq!(data["message"], "Parsing of message failed");
        assert_eq!(data["cause"], cause);
    }
}
