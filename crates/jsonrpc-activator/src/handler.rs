//! Request dispatch: one request to at most one response, and whole
//! messages (single or batch) to an [`Output`].

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::debug;

use crate::error::{ErrorDataFactory, JsonRpcError, JsonRpcErrorObject};
use crate::mapping::ErrorKind;
use crate::registry::MethodRegistry;
use crate::request::JsonRpcRequest;
use crate::response::{JsonRpcMessage, Output};

/// Resolves a validated request to its method and builds the response.
///
/// Notifications never get a response from here, whatever the outcome.
pub struct RequestHandler<K: ErrorKind> {
    registry: Arc<MethodRegistry<K>>,
}

impl<K: ErrorKind> RequestHandler<K> {
    pub fn new(registry: Arc<MethodRegistry<K>>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &MethodRegistry<K> {
        &self.registry
    }

    pub async fn process_request(&self, request: JsonRpcRequest) -> Option<JsonRpcMessage> {
        let JsonRpcRequest {
            method, params, id, ..
        } = request;

        let outcome = match self.registry.lookup(&method) {
            Some(adapter) => adapter.invoke(params).await,
            None => {
                debug!(method = %method, "method not found");
                Err(JsonRpcErrorObject::method_not_found())
            }
        };

        let Some(id) = id else {
            if let Err(error) = &outcome {
                debug!(
                    method = %method,
                    code = error.code,
                    "error suppressed for notification"
                );
            }
            return None;
        };

        Some(match outcome {
            Ok(result) => JsonRpcMessage::success(id, result),
            Err(error) => JsonRpcMessage::error(JsonRpcError::new(id, error)),
        })
    }
}

/// Envelope validation and batch assembly for an already parsed message.
pub struct JsonRequestHandler<K: ErrorKind> {
    request_handler: RequestHandler<K>,
    error_data: ErrorDataFactory,
}

impl<K: ErrorKind> JsonRequestHandler<K> {
    pub fn new(request_handler: RequestHandler<K>, error_data: ErrorDataFactory) -> Self {
        Self {
            request_handler,
            error_data,
        }
    }

    pub fn request_handler(&self) -> &RequestHandler<K> {
        &self.request_handler
    }

    /// Zero, one or many responses for one message.
    ///
    /// An empty batch is a single `Invalid Request`, not an array. A batch
    /// whose elements were all notifications produces no output.
    pub async fn process_value(&self, message: Value) -> Option<Output> {
        match message {
            Value::Array(elements) if elements.is_empty() => {
                debug!("rejecting empty batch");
                let data = self.error_data.create("Request batch cannot be empty", None);
                Some(Output::Single(JsonRpcError::invalid_request(data).into()))
            }
            Value::Array(elements) => self.process_batch(elements).await,
            single => self.process_element(single).await.map(Output::Single),
        }
    }

    /// Elements run concurrently; responses keep the order of the elements.
    async fn process_batch(&self, elements: Vec<Value>) -> Option<Output> {
        debug!(size = elements.len(), "processing batch");
        let responses = join_all(
            elements
                .into_iter()
                .map(|element| self.process_element(element)),
        )
        .await;
        Output::batch(responses.into_iter().flatten().collect())
    }

    async fn process_element(&self, element: Value) -> Option<JsonRpcMessage> {
        match JsonRpcRequest::from_value(element) {
            Ok(request) => self.request_handler.process_request(request).await,
            Err(e) => {
                debug!("invalid request: {}", e);
                let data = self
                    .error_data
                    .create("Deserialization of request json failed", Some(&e));
                Some(JsonRpcError::invalid_request(data).into())
            }
        }
    }

    /// Single `Parse error` for text that is not JSON; never wrapped in a batch.
    pub fn parse_error(&self, cause: &serde_json::Error) -> Output {
        debug!("parse error: {}", cause);
        let data = self
            .error_data
            .create("Parsing of message failed", Some(cause));
        Output::Single(JsonRpcError::parse_error(data).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{StrictCodec, ValueCodec, ValueType};
    use crate::error_codes::{INVALID_REQUEST, METHOD_NOT_FOUND};
    use crate::mapping::Unmapped;
    use crate::method::MethodBinding;
    use crate::registry::{PendingReceiver, ReceiverBindings};
    use crate::types::RequestId;
    use serde_json::json;

    fn handler() -> JsonRequestHandler<Unmapped> {
        let receiver = ReceiverBindings::new(|| ())
            .method(
                MethodBinding::new("sum")
                    .positional_param(ValueType::array_of(ValueType::Integer))
                    .returns(ValueType::Integer)
                    .sync_handler(|_, args| Ok(args.get::<Vec<i64>>(0)?.iter().sum::<i64>())),
            )
            .method(
                MethodBinding::new("notify_hello")
                    .positional_param(ValueType::Integer)
                    .void()
                    .sync_handler(|_, _| Ok(())),
            );
        let codec: Arc<dyn ValueCodec> = Arc::new(StrictCodec);
        let adapters = Box::new(receiver)
            .bind(&codec, ErrorDataFactory::default())
            .unwrap();
        let registry = Arc::new(MethodRegistry::new(adapters).unwrap());
        JsonRequestHandler::new(RequestHandler::new(registry), ErrorDataFactory::default())
    }

    #[tokio::test]
    async fn test_single_request() {
        let output = handler()
            .process_value(json!({"jsonrpc": "2.0", "method": "sum", "params": [[1, 2, 4]], "id": "1"}))
            .await
            .unwrap();
        assert!(!output.is_batch());
        assert_eq!(output.responses()[0].id(), &RequestId::from("1"));
        assert!(!output.responses()[0].is_error());
    }

    #[tokio::test]
    async fn test_method_not_found_echoes_id() {
        let output = handler()
            .process_value(json!({"jsonrpc": "2.0", "method": "foobar", "id": 7}))
            .await
            .unwrap();
        let response = &output.responses()[0];
        assert_eq!(response.error_code(), Some(METHOD_NOT_FOUND));
        assert_eq!(response.id(), &RequestId::from(7));
    }

    #[tokio::test]
    async fn test_notifications_are_silent() {
        let handler = handler();
        let ok = json!({"jsonrpc": "2.0", "method": "notify_hello", "params": [7]});
        let unknown = json!({"jsonrpc": "2.0", "method": "foobar"});
        let bad_params = json!({"jsonrpc": "2.0", "method": "sum", "params": {"a": 1}});

        assert_eq!(handler.process_value(ok.clone()).await, None);
        assert_eq!(handler.process_value(unknown.clone()).await, None);
        assert_eq!(handler.process_value(bad_params.clone()).await, None);
        assert_eq!(handler.process_value(json!([ok, unknown, bad_params])).await, None);
    }

    #[tokio::test]
    async fn test_invalid_notification_envelope_still_reported() {
        let output = handler()
            .process_value(json!({"jsonrpc": "1.0", "method": "notify_hello"}))
            .await
            .unwrap();
        assert_eq!(output.responses()[0].error_code(), Some(INVALID_REQUEST));
        assert_eq!(output.responses()[0].id(), &RequestId::Null);
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_skips_notifications() {
        let output = handler()
            .process_value(json!([
                {"jsonrpc": "2.0", "method": "sum", "params": [[1, 2]], "id": "1"},
                {"jsonrpc": "2.0", "method": "notify_hello", "params": [7]},
                {"foo": "boo"},
                {"jsonrpc": "2.0", "method": "get_data", "id": "9"},
                {"jsonrpc": "2.0", "method": "sum", "params": [[5]], "id": "2"}
            ]))
            .await
            .unwrap();

        assert!(output.is_batch());
        let responses = output.responses();
        assert_eq!(responses.len(), 4);
        assert_eq!(responses[0].id(), &RequestId::from("1"));
        assert_eq!(responses[1].error_code(), Some(INVALID_REQUEST));
        assert_eq!(responses[2].error_code(), Some(METHOD_NOT_FOUND));
        assert_eq!(responses[3].id(), &RequestId::from("2"));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let output = handler().process_value(json!([])).await.unwrap();
        assert!(!output.is_batch());
        assert_eq!(output.responses()[0].error_code(), Some(INVALID_REQUEST));
    }
}
