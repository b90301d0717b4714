use serde::Serialize;
use serde_json::Value;

use crate::error::JsonRpcError;
use crate::types::{JsonRpcVersion, RequestId};

/// Result data for a JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseResult {
    /// Success result with data
    Success(Value),
    /// Null result (for void methods)
    Null,
}

impl ResponseResult {
    pub fn is_null(&self) -> bool {
        match self {
            ResponseResult::Null => true,
            ResponseResult::Success(value) => value.is_null(),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            ResponseResult::Success(value) => value,
            ResponseResult::Null => Value::Null,
        }
    }
}

impl From<Value> for ResponseResult {
    fn from(value: Value) -> Self {
        if value.is_null() {
            ResponseResult::Null
        } else {
            ResponseResult::Success(value)
        }
    }
}

/// A successful JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcResponse {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub id: RequestId,
    pub result: ResponseResult,
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: ResponseResult) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id,
            result,
        }
    }
}

/// Either a success or a failure response, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    /// Successful response with result field
    Response(JsonRpcResponse),
    /// Error response with error field
    Error(JsonRpcError),
}

impl JsonRpcMessage {
    pub fn success(id: RequestId, result: ResponseResult) -> Self {
        Self::Response(JsonRpcResponse::new(id, result))
    }

    pub fn error(error: JsonRpcError) -> Self {
        Self::Error(error)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, JsonRpcMessage::Error(_))
    }

    pub fn id(&self) -> &RequestId {
        match self {
            JsonRpcMessage::Response(resp) => &resp.id,
            JsonRpcMessage::Error(err) => &err.id,
        }
    }

    /// Error code of a failure response
    pub fn error_code(&self) -> Option<i64> {
        match self {
            JsonRpcMessage::Response(_) => None,
            JsonRpcMessage::Error(err) => Some(err.error.code),
        }
    }
}

impl From<JsonRpcError> for JsonRpcMessage {
    fn from(error: JsonRpcError) -> Self {
        Self::Error(error)
    }
}

/// What goes back on the wire for one incoming message.
///
/// A batch is never empty: a batch without responses is no output at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Single(JsonRpcMessage),
    Batch(Vec<JsonRpcMessage>),
}

impl Output {
    /// Wraps collected batch responses, or `None` when every element was suppressed.
    pub fn batch(responses: Vec<JsonRpcMessage>) -> Option<Self> {
        if responses.is_empty() {
            None
        } else {
            Some(Output::Batch(responses))
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, Output::Batch(_))
    }

    pub fn responses(&self) -> &[JsonRpcMessage] {
        match self {
            Output::Single(message) => std::slice::from_ref(message),
            Output::Batch(messages) => messages,
        }
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<JsonRpcMessage> for Output {
    fn from(message: JsonRpcMessage) -> Self {
        Output::Single(message)
    }
}
