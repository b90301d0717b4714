use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::{JsonRpcVersion, RequestId};

/// Parameters for a JSON-RPC request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestParams {
    /// Positional parameters as an array
    Array(Vec<Value>),
    /// Named parameters as an object
    Object(Map<String, Value>),
}

impl RequestParams {
    /// Structured params from a wire value. `null` means no params; scalars are not params.
    pub fn from_value(value: Value) -> Result<Option<Self>, EnvelopeError> {
        match value {
            Value::Null => Ok(None),
            Value::Array(items) => Ok(Some(RequestParams::Array(items))),
            Value::Object(map) => Ok(Some(RequestParams::Object(map))),
            _ => Err(EnvelopeError::InvalidParams),
        }
    }
}

/// Why a request element was rejected before method resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("request must be a JSON object")]
    NotAnObject,

    #[error("member 'jsonrpc' must be exactly \"2.0\"")]
    InvalidVersion,

    #[error("member 'method' must be a string")]
    InvalidMethod,

    #[error("member 'id' must be a string, a number or null")]
    InvalidId,

    #[error("member 'params' must be an array or an object")]
    InvalidParams,
}

/// A JSON-RPC request. Without an `id` it is a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    pub version: JsonRpcVersion,
    pub method: String,
    pub params: Option<RequestParams>,
    pub id: Option<RequestId>,
}

impl JsonRpcRequest {
    /// Validate one request element of a message.
    ///
    /// An explicit `"id": null` is kept as `Some(RequestId::Null)`; only an
    /// absent `id` makes the request a notification.
    pub fn from_value(value: Value) -> Result<Self, EnvelopeError> {
        let Value::Object(mut obj) = value else {
            return Err(EnvelopeError::NotAnObject);
        };

        let version = obj
            .get("jsonrpc")
            .and_then(JsonRpcVersion::from_value)
            .ok_or(EnvelopeError::InvalidVersion)?;

        let method = match obj.remove("method") {
            Some(Value::String(method)) => method,
            _ => return Err(EnvelopeError::InvalidMethod),
        };

        let id = match obj.get("id") {
            Some(raw) => Some(RequestId::from_value(raw).ok_or(EnvelopeError::InvalidId)?),
            None => None,
        };

        let params = match obj.remove("params") {
            Some(raw) => RequestParams::from_value(raw)?,
            None => None,
        };

        Ok(Self {
            version,
            method,
            params,
            id,
        })
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

impl TryFrom<Value> for JsonRpcRequest {
    type Error = EnvelopeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}
