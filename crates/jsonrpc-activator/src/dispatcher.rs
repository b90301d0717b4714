//! The assembled dispatcher and its builder.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::codec::{StrictCodec, ValueCodec};
use crate::error::{ErrorDataFactory, JsonRpcErrorObject, RegistrationError};
use crate::handler::{JsonRequestHandler, RequestHandler};
use crate::mapping::{ErrorKind, Unmapped};
use crate::method::{MethodAdapter, MethodBinding};
use crate::registry::{MethodRegistry, PendingReceiver, ReceiverBindings};
use crate::request::RequestParams;
use crate::response::Output;

/// Sent when an output cannot be serialized.
const INTERNAL_ERROR_RESPONSE: &str =
    r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#;

/// Dispatcher settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Attach a diagnostic `data` member to parse, envelope and params errors.
    /// Meant for local development; internal errors never carry data.
    pub debug_error_data: bool,
}

/// Builder for [`JsonRpcDispatcher`]
pub struct JsonRpcDispatcherBuilder<K: ErrorKind = Unmapped> {
    config: DispatcherConfig,
    codec: Arc<dyn ValueCodec>,
    receivers: Vec<Box<dyn PendingReceiver<K>>>,
}

impl<K: ErrorKind> JsonRpcDispatcherBuilder<K> {
    pub fn new() -> Self {
        Self {
            config: DispatcherConfig::default(),
            codec: Arc::new(StrictCodec),
            receivers: Vec::new(),
        }
    }

    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn debug_error_data(mut self, enabled: bool) -> Self {
        self.config.debug_error_data = enabled;
        self
    }

    /// Replace the default [`StrictCodec`].
    pub fn codec<C: ValueCodec + 'static>(mut self, codec: C) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    /// Register methods served by receivers from `factory`, without receiver-level rules.
    pub fn register<R, F>(
        self,
        factory: F,
        bindings: impl IntoIterator<Item = MethodBinding<R, K>>,
    ) -> Self
    where
        R: Send + 'static,
        F: Fn() -> R + Send + Sync + 'static,
    {
        self.register_receiver(ReceiverBindings::new(factory).methods(bindings))
    }

    pub fn register_receiver<R>(mut self, receiver: ReceiverBindings<R, K>) -> Self
    where
        R: Send + 'static,
    {
        self.receivers.push(Box::new(receiver));
        self
    }

    /// Validate every registration and freeze the method table.
    pub fn build(self) -> Result<JsonRpcDispatcher<K>, RegistrationError> {
        let error_data = ErrorDataFactory::new(self.config.debug_error_data);

        let mut adapters = Vec::new();
        for receiver in self.receivers {
            adapters.extend(receiver.bind(&self.codec, error_data)?);
        }
        let registry = Arc::new(MethodRegistry::new(adapters)?);
        debug!(methods = registry.len(), "JSON-RPC dispatcher built");

        Ok(JsonRpcDispatcher {
            handler: JsonRequestHandler::new(RequestHandler::new(registry), error_data),
            config: self.config,
        })
    }
}

impl<K: ErrorKind> Default for JsonRpcDispatcherBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable JSON-RPC 2.0 dispatcher.
///
/// Shareable across tasks; every call is independent of every other.
pub struct JsonRpcDispatcher<K: ErrorKind = Unmapped> {
    handler: JsonRequestHandler<K>,
    config: DispatcherConfig,
}

impl<K: ErrorKind> JsonRpcDispatcher<K> {
    pub fn builder() -> JsonRpcDispatcherBuilder<K> {
        JsonRpcDispatcherBuilder::new()
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Handle one raw message. `None` means nothing is to be sent back.
    pub async fn process_message(&self, message: &str) -> Option<String> {
        let output = match serde_json::from_str::<Value>(message) {
            Ok(value) => self.handler.process_value(value).await?,
            Err(e) => self.handler.parse_error(&e),
        };
        match output.to_json_string() {
            Ok(text) => Some(text),
            Err(e) => {
                error!("failed to serialize JSON-RPC output: {}", e);
                Some(INTERNAL_ERROR_RESPONSE.to_string())
            }
        }
    }

    /// [`process_message`](Self::process_message) for callers outside an async runtime.
    pub fn process_message_blocking(&self, message: &str) -> Option<String> {
        futures::executor::block_on(self.process_message(message))
    }

    /// Handle a message that is already a JSON tree.
    pub async fn process_value(&self, message: Value) -> Option<Output> {
        self.handler.process_value(message).await
    }

    /// In-process access to a bound method.
    pub fn method(&self, name: &str) -> Option<LocalMethod<'_, K>> {
        self.registry()
            .lookup(name)
            .map(|adapter| LocalMethod { adapter })
    }

    pub fn method_names(&self) -> Vec<String> {
        self.registry().method_names()
    }

    fn registry(&self) -> &MethodRegistry<K> {
        self.handler.request_handler().registry()
    }
}

/// A bound method called directly, bypassing the envelope.
pub struct LocalMethod<'a, K: ErrorKind> {
    adapter: &'a MethodAdapter<K>,
}

impl<K: ErrorKind> LocalMethod<'_, K> {
    pub fn name(&self) -> &str {
        &self.adapter.info().name
    }

    /// Call with wire-shaped params: an array, an object, or `None`.
    pub async fn invoke(&self, params: Option<Value>) -> Result<Value, JsonRpcErrorObject> {
        let params = match params {
            Some(value) => RequestParams::from_value(value)
                .map_err(|_| JsonRpcErrorObject::invalid_params(None))?,
            None => None,
        };
        self.adapter
            .invoke(params)
            .await
            .map(|result| result.into_value())
    }

    /// Call a one-parameter method with its single positional argument.
    pub async fn invoke_single(&self, param: Value) -> Result<Value, JsonRpcErrorObject> {
        self.invoke(Some(Value::Array(vec![param]))).await
    }
}
