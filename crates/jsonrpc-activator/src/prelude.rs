//! # JSON-RPC Dispatcher Prelude
//!
//! Re-exports of the types a host needs to declare and serve methods.
//!
//! ```rust
//! use jsonrpc_activator::prelude::*;
//! ```

pub use crate::codec::{StrictCodec, ValueCodec, ValueType};
pub use crate::dispatcher::{DispatcherConfig, JsonRpcDispatcher, JsonRpcDispatcherBuilder};
pub use crate::error::{JsonRpcErrorObject, RegistrationError};
pub use crate::mapping::{ErrorKind, Unmapped};
pub use crate::method::{Arguments, MethodBinding, MethodFailure, ParamsShape};
pub use crate::registry::ReceiverBindings;
pub use crate::response::Output;
pub use crate::types::RequestId;

// Standard error codes
pub use crate::error_codes::*;
