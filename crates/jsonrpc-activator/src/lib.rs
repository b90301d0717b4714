//! # JSON-RPC 2.0 Method Dispatcher
//!
//! An embeddable, transport-agnostic JSON-RPC 2.0 server core. The host
//! registers receiver factories and the methods they expose; the dispatcher
//! takes raw messages and returns protocol-compliant responses.
//!
//! ## Features
//! - Single and batch requests, notification suppression
//! - Positional, named and missing params shapes per method
//! - Parameter and result checking against declared value types
//! - Error mapping from application error kinds, per receiver and per method
//! - Failures inside methods never escape as anything but a response
//!
//! ```rust
//! use jsonrpc_activator::prelude::*;
//!
//! let dispatcher = JsonRpcDispatcher::<Unmapped>::builder()
//!     .register(
//!         || (),
//!         [MethodBinding::new("subtract")
//!             .param("minuend", ValueType::Integer)
//!             .param("subtrahend", ValueType::Integer)
//!             .returns(ValueType::Integer)
//!             .shapes([ParamsShape::Named])
//!             .sync_handler(|_, args| Ok(args.get::<i64>(0)? - args.get::<i64>(1)?))],
//!     )
//!     .build()
//!     .unwrap();
//!
//! let response = dispatcher.process_message_blocking(
//!     r#"{"jsonrpc":"2.0","method":"subtract","params":{"minuend":42,"subtrahend":23},"id":3}"#,
//! );
//! assert_eq!(response.as_deref(), Some(r#"{"jsonrpc":"2.0","id":3,"result":19}"#));
//! ```

pub mod codec;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod mapping;
pub mod method;
pub mod registry;
pub mod request;
pub mod response;
pub mod types;

pub mod prelude;

// Re-export main types
pub use codec::{CodecError, StrictCodec, ValueCodec, ValueType};
pub use dispatcher::{DispatcherConfig, JsonRpcDispatcher, JsonRpcDispatcherBuilder, LocalMethod};
pub use error::{JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject, RegistrationError};
pub use handler::{JsonRequestHandler, RequestHandler};
pub use mapping::{ErrorKind, MappingRule, Unmapped};
pub use method::{
    Arguments, MethodBinding, MethodFailure, MethodInfo, ParamError, ParamsShape, ReturnType,
};
pub use registry::{MethodRegistry, ReceiverBindings};
pub use request::{EnvelopeError, JsonRpcRequest, RequestParams};
pub use response::{JsonRpcMessage, JsonRpcResponse, Output, ResponseResult};
pub use types::{JsonRpcVersion, RequestId};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}
