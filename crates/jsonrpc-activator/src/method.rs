//! Method bindings and the adapter that calls them.
//!
//! A [`MethodBinding`] is what the host declares: name, parameters, return
//! type, accepted params shapes, method-level error rules and the handler.
//! Registration turns it into an immutable [`MethodInfo`] plus a
//! [`MethodAdapter`], which owns the whole path from wire params to
//! result or error object.

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error};

use crate::codec::{CodecError, ValueCodec, ValueType, to_wire};
use crate::error::{ErrorDataFactory, JsonRpcErrorObject, RegistrationError};
use crate::mapping::{ErrorKind, ErrorMapping, MappingRule, MappingScope, MethodErrorMapping};
use crate::request::RequestParams;
use crate::response::ResponseResult;

/// Wire encoding of `params` a method accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamsShape {
    /// JSON array, one item per declared parameter
    Positional,
    /// JSON object keyed by parameter name
    Named,
    /// No params at all (absent or `null`)
    Missing,
}

impl ParamsShape {
    /// Shape of the params actually sent.
    pub fn of(params: Option<&RequestParams>) -> Self {
        match params {
            None => ParamsShape::Missing,
            Some(RequestParams::Array(_)) => ParamsShape::Positional,
            Some(RequestParams::Object(_)) => ParamsShape::Named,
        }
    }
}

impl fmt::Display for ParamsShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamsShape::Positional => "positional",
            ParamsShape::Named => "named",
            ParamsShape::Missing => "missing",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescriptor {
    /// Required for methods that accept named params
    pub name: Option<String>,
    pub ty: ValueType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    /// Successful calls always answer `null`
    Void,
    Value(ValueType),
}

/// Decoded call arguments, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<Value>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("missing argument #{0}")]
    Missing(usize),

    #[error("argument #{index} could not be decoded: {message}")]
    Decode { index: usize, message: String },
}

impl Arguments {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Deserialize argument `index` into a host type.
    pub fn get<T: DeserializeOwned>(&self, index: usize) -> Result<T, ParamError> {
        let value = self.values.get(index).ok_or(ParamError::Missing(index))?;
        T::deserialize(value).map_err(|e| ParamError::Decode {
            index,
            message: e.to_string(),
        })
    }
}

/// How a method body reports failure.
#[derive(Debug)]
pub enum MethodFailure<K> {
    /// Explicit protocol error, sent as-is
    Custom(JsonRpcErrorObject),
    /// Application error of a known kind, resolved through the error mapping
    Raised { kind: K, detail: String },
    /// The body rejected its own arguments
    InvalidParams(String),
    /// Anything else; always `Internal error`
    Unexpected(anyhow::Error),
}

impl<K: ErrorKind> MethodFailure<K> {
    pub fn custom(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        MethodFailure::Custom(JsonRpcErrorObject::custom(code, message, data))
    }

    pub fn raised(kind: K, detail: impl Into<String>) -> Self {
        MethodFailure::Raised {
            kind,
            detail: detail.into(),
        }
    }
}

impl<K: fmt::Debug> fmt::Display for MethodFailure<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodFailure::Custom(object) => write!(f, "{}", object),
            MethodFailure::Raised { kind, detail } => write!(f, "{:?}: {}", kind, detail),
            MethodFailure::InvalidParams(message) => write!(f, "invalid params: {}", message),
            MethodFailure::Unexpected(err) => write!(f, "{:#}", err),
        }
    }
}

impl<K: fmt::Debug> std::error::Error for MethodFailure<K> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MethodFailure::Unexpected(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl<K> From<anyhow::Error> for MethodFailure<K> {
    fn from(err: anyhow::Error) -> Self {
        MethodFailure::Unexpected(err)
    }
}

impl<K> From<ParamError> for MethodFailure<K> {
    fn from(err: ParamError) -> Self {
        MethodFailure::InvalidParams(err.to_string())
    }
}

impl<K> From<JsonRpcErrorObject> for MethodFailure<K> {
    fn from(object: JsonRpcErrorObject) -> Self {
        MethodFailure::Custom(object)
    }
}

pub type MethodResult<K> = Result<Value, MethodFailure<K>>;

/// Type-erased method body taking the receiver produced for this call.
pub(crate) type Handler<R, K> =
    Arc<dyn Fn(R, Arguments) -> BoxFuture<'static, MethodResult<K>> + Send + Sync>;

/// Runs a bound method: produce the receiver, then call the body with it.
#[async_trait]
pub trait Invoker<K: ErrorKind>: Send + Sync {
    async fn invoke(&self, args: Arguments) -> MethodResult<K>;
}

/// Host-side declaration of one method on receiver type `R`.
pub struct MethodBinding<R, K: ErrorKind> {
    name: String,
    params: Vec<ParamDescriptor>,
    returns: ReturnType,
    shapes: Option<Vec<ParamsShape>>,
    rules: Vec<MappingRule<K>>,
    handler: Option<Handler<R, K>>,
}

impl<R, K> MethodBinding<R, K>
where
    R: Send + 'static,
    K: ErrorKind,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: ReturnType::Value(ValueType::Any),
            shapes: None,
            rules: Vec::new(),
            handler: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare the next parameter with a name usable in named params.
    pub fn param(mut self, name: impl Into<String>, ty: ValueType) -> Self {
        self.params.push(ParamDescriptor {
            name: Some(name.into()),
            ty,
        });
        self
    }

    /// Declare the next parameter without a name; positional params only.
    pub fn positional_param(mut self, ty: ValueType) -> Self {
        self.params.push(ParamDescriptor { name: None, ty });
        self
    }

    pub fn returns(mut self, ty: ValueType) -> Self {
        self.returns = ReturnType::Value(ty);
        self
    }

    pub fn void(mut self) -> Self {
        self.returns = ReturnType::Void;
        self
    }

    /// Accepted params shapes, tried in order.
    pub fn shapes(mut self, shapes: impl IntoIterator<Item = ParamsShape>) -> Self {
        self.shapes = Some(shapes.into_iter().collect());
        self
    }

    /// Method-level mapping rule, taking precedence over receiver-level rules.
    pub fn error_rule(mut self, kind: K, code: i64, message: impl Into<String>) -> Self {
        self.rules.push(MappingRule::new(kind, code, message));
        self
    }

    pub fn handler<F, Fut, T>(mut self, f: F) -> Self
    where
        F: Fn(R, Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, MethodFailure<K>>> + Send + 'static,
        T: Serialize + 'static,
    {
        self.handler = Some(Arc::new(move |receiver, args| {
            let fut = f(receiver, args);
            async move {
                fut.await.and_then(|value| {
                    to_wire(value).map_err(|e| MethodFailure::Unexpected(e.into()))
                })
            }
            .boxed()
        }));
        self
    }

    pub fn sync_handler<F, T>(mut self, f: F) -> Self
    where
        F: Fn(R, Arguments) -> Result<T, MethodFailure<K>> + Send + Sync + 'static,
        T: Serialize + 'static,
    {
        self.handler = Some(Arc::new(move |receiver, args| {
            let result = f(receiver, args)
                .and_then(|value| to_wire(value).map_err(|e| MethodFailure::Unexpected(e.into())));
            futures::future::ready(result).boxed()
        }));
        self
    }

    /// Validate the declaration and split it into its registered parts.
    pub(crate) fn into_parts(
        self,
        receiver_rules: Arc<ErrorMapping<K>>,
    ) -> Result<(MethodInfo<K>, Handler<R, K>), RegistrationError> {
        let shapes = match self.shapes {
            Some(shapes) => shapes,
            None if self.params.is_empty() => vec![ParamsShape::Positional, ParamsShape::Missing],
            None => vec![ParamsShape::Positional],
        };
        if shapes.is_empty() {
            return Err(RegistrationError::NoParamsShape(self.name));
        }
        if shapes.contains(&ParamsShape::Missing) && !self.params.is_empty() {
            return Err(RegistrationError::MissingShapeWithParameters(self.name));
        }
        if shapes.contains(&ParamsShape::Named) {
            if let Some(index) = self.params.iter().position(|p| p.name.is_none()) {
                return Err(RegistrationError::UnnamedParameter {
                    method: self.name,
                    index,
                });
            }
        }
        for (index, param) in self.params.iter().enumerate() {
            let Some(name) = &param.name else { continue };
            if self.params[..index]
                .iter()
                .any(|earlier| earlier.name.as_ref() == Some(name))
            {
                return Err(RegistrationError::DuplicateParameter {
                    method: self.name.clone(),
                    name: name.clone(),
                });
            }
        }

        let Some(handler) = self.handler else {
            return Err(RegistrationError::MissingHandler(self.name));
        };
        let method_rules = ErrorMapping::new(self.rules, MappingScope::Method)?;

        let info = MethodInfo {
            name: self.name,
            params: self.params,
            returns: self.returns,
            shapes,
            errors: MethodErrorMapping::new(method_rules, receiver_rules),
        };
        Ok((info, handler))
    }
}

/// A registered method. Immutable once built.
#[derive(Debug, Clone)]
pub struct MethodInfo<K> {
    pub name: String,
    pub params: Vec<ParamDescriptor>,
    pub returns: ReturnType,
    pub shapes: Vec<ParamsShape>,
    pub errors: MethodErrorMapping<K>,
}

impl<K: ErrorKind> MethodInfo<K> {
    pub fn is_void(&self) -> bool {
        matches!(self.returns, ReturnType::Void)
    }

    /// First accepted shape equal to the shape actually sent.
    pub fn select_shape(&self, params: Option<&RequestParams>) -> Option<ParamsShape> {
        let sent = ParamsShape::of(params);
        self.shapes.iter().copied().find(|shape| *shape == sent)
    }
}

/// Why wire params were rejected; reported as `Invalid params`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
enum ParamsRejection {
    #[error("params shape '{0}' is not accepted")]
    Shape(ParamsShape),

    #[error("expected {expected} positional params, got {actual}")]
    Count { expected: usize, actual: usize },

    #[error("missing named param '{0}'")]
    MissingName(String),

    #[error("param {param}: {source}")]
    Decode { param: String, source: CodecError },
}

/// Binds one method to its invoker, codec and error mapping.
pub struct MethodAdapter<K: ErrorKind> {
    info: MethodInfo<K>,
    invoker: Arc<dyn Invoker<K>>,
    codec: Arc<dyn ValueCodec>,
    error_data: ErrorDataFactory,
}

impl<K: ErrorKind> MethodAdapter<K> {
    pub fn new(
        info: MethodInfo<K>,
        invoker: Arc<dyn Invoker<K>>,
        codec: Arc<dyn ValueCodec>,
        error_data: ErrorDataFactory,
    ) -> Self {
        Self {
            info,
            invoker,
            codec,
            error_data,
        }
    }

    pub fn info(&self) -> &MethodInfo<K> {
        &self.info
    }

    /// Decode `params`, call the method and encode the outcome.
    ///
    /// Never fails with anything but a protocol error object; panics in the
    /// receiver factory or method body become `Internal error`.
    pub async fn invoke(
        &self,
        params: Option<RequestParams>,
    ) -> Result<ResponseResult, JsonRpcErrorObject> {
        let args = self.decode(params).map_err(|rejection| {
            debug!(method = %self.info.name, "invalid params: {}", rejection);
            JsonRpcErrorObject::invalid_params(
                self.error_data.create("Invalid params", Some(&rejection)),
            )
        })?;

        let outcome = AssertUnwindSafe(self.invoker.invoke(args))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(value)) => self.encode(value),
            Ok(Err(failure)) => Err(self.resolve_failure(failure)),
            Err(panic) => {
                error!(
                    method = %self.info.name,
                    "method panicked: {}",
                    panic_message(panic.as_ref())
                );
                Err(JsonRpcErrorObject::internal_error())
            }
        }
    }

    fn decode(&self, params: Option<RequestParams>) -> Result<Arguments, ParamsRejection> {
        let shape = self
            .info
            .select_shape(params.as_ref())
            .ok_or_else(|| ParamsRejection::Shape(ParamsShape::of(params.as_ref())))?;

        let declared = &self.info.params;
        let values = match (shape, params) {
            (ParamsShape::Positional, Some(RequestParams::Array(items))) => {
                if items.len() != declared.len() {
                    return Err(ParamsRejection::Count {
                        expected: declared.len(),
                        actual: items.len(),
                    });
                }
                declared
                    .iter()
                    .zip(items.iter())
                    .enumerate()
                    .map(|(index, (param, item))| self.decode_one(param, index, item))
                    .collect::<Result<Vec<_>, _>>()?
            }
            (ParamsShape::Named, Some(RequestParams::Object(map))) => self.decode_named(&map)?,
            _ => Vec::new(),
        };
        Ok(Arguments::new(values))
    }

    fn decode_named(&self, map: &Map<String, Value>) -> Result<Vec<Value>, ParamsRejection> {
        let mut values = Vec::with_capacity(self.info.params.len());
        for (index, param) in self.info.params.iter().enumerate() {
            let name = param.name.as_deref().unwrap_or_default();
            let item = map
                .get(name)
                .ok_or_else(|| ParamsRejection::MissingName(name.to_string()))?;
            values.push(self.decode_one(param, index, item)?);
        }
        Ok(values)
    }

    fn decode_one(
        &self,
        param: &ParamDescriptor,
        index: usize,
        item: &Value,
    ) -> Result<Value, ParamsRejection> {
        self.codec
            .decode(item, &param.ty)
            .map_err(|source| ParamsRejection::Decode {
                param: param.name.clone().unwrap_or_else(|| format!("#{}", index)),
                source,
            })
    }

    fn encode(&self, value: Value) -> Result<ResponseResult, JsonRpcErrorObject> {
        match &self.info.returns {
            ReturnType::Void => Ok(ResponseResult::Null),
            ReturnType::Value(ty) => match self.codec.encode(value, ty) {
                Ok(encoded) => Ok(ResponseResult::from(encoded)),
                Err(e) => {
                    error!(method = %self.info.name, "result could not be encoded: {}", e);
                    Err(JsonRpcErrorObject::internal_error())
                }
            },
        }
    }

    fn resolve_failure(&self, failure: MethodFailure<K>) -> JsonRpcErrorObject {
        match failure {
            MethodFailure::Custom(object) => object,
            MethodFailure::InvalidParams(message) => {
                debug!(method = %self.info.name, "invalid params: {}", message);
                JsonRpcErrorObject::invalid_params(
                    self.error_data.create("Invalid params", Some(&message)),
                )
            }
            MethodFailure::Raised { kind, detail } => match self.info.errors.resolve(&kind) {
                Some((rule, scope)) => {
                    debug!(
                        method = %self.info.name,
                        "{:?} mapped to {} by {} rule: {}",
                        kind,
                        rule.code,
                        scope.as_str(),
                        detail
                    );
                    rule.to_error_object()
                }
                None => {
                    error!(method = %self.info.name, "unmapped error {:?}: {}", kind, detail);
                    JsonRpcErrorObject::internal_error()
                }
            },
            MethodFailure::Unexpected(err) => {
                error!(method = %self.info.name, "method failed: {:#}", err);
                JsonRpcErrorObject::internal_error()
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::StrictCodec;
    use crate::error_codes::{INTERNAL_ERROR, INVALID_PARAMS};
    use crate::mapping::Unmapped;
    use serde_json::json;
    use tracing_test::traced_test;

    struct FnInvoker(Handler<(), Unmapped>);

    #[async_trait]
    impl Invoker<Unmapped> for FnInvoker {
        async fn invoke(&self, args: Arguments) -> MethodResult<Unmapped> {
            (self.0)((), args).await
        }
    }

    fn adapter(binding: MethodBinding<(), Unmapped>, debug_data: bool) -> MethodAdapter<Unmapped> {
        let (info, handler) = binding.into_parts(Arc::new(ErrorMapping::empty())).unwrap();
        MethodAdapter::new(
            info,
            Arc::new(FnInvoker(handler)),
            Arc::new(StrictCodec),
            ErrorDataFactory::new(debug_data),
        )
    }

    fn subtract() -> MethodBinding<(), Unmapped> {
        MethodBinding::new("subtract")
            .param("minuend", ValueType::Integer)
            .param("subtrahend", ValueType::Integer)
            .returns(ValueType::Integer)
            .shapes([ParamsShape::Positional, ParamsShape::Named])
            .sync_handler(|_, args| Ok(args.get::<i64>(0)? - args.get::<i64>(1)?))
    }

    fn array(items: Value) -> Option<RequestParams> {
        RequestParams::from_value(items).unwrap()
    }

    #[tokio::test]
    async fn test_positional_and_named_agree() {
        let adapter = adapter(subtract(), false);

        let positional = adapter.invoke(array(json!([42, 23]))).await.unwrap();
        let named = adapter
            .invoke(array(json!({"subtrahend": 23, "minuend": 42, "extra": true})))
            .await
            .unwrap();

        assert_eq!(positional, ResponseResult::Success(json!(19)));
        assert_eq!(positional, named);
    }

    #[tokio::test]
    async fn test_params_rejections_are_invalid_params() {
        let adapter = adapter(subtract(), false);

        for params in [
            array(json!([42])),
            array(json!([42, 23, 1])),
            array(json!(["abc", "def"])),
            array(json!({"minuend": 42})),
            None,
        ] {
            let err = adapter.invoke(params).await.unwrap_err();
            assert_eq!(err.code, INVALID_PARAMS);
            assert_eq!(err.message, "Invalid params");
            assert_eq!(err.data, None);
        }
    }

    #[tokio::test]
    async fn test_debug_data_describes_rejection() {
        let adapter = adapter(subtract(), true);
        let err = adapter.invoke(array(json!([1]))).await.unwrap_err();
        let data = err.data.unwrap();
        assert_eq!(data["message"], "Invalid params");
        assert_eq!(data["cause"], "expected 2 positional params, got 1");
    }

    #[tokio::test]
    async fn test_void_method_answers_null() {
        let adapter = adapter(
            MethodBinding::new("notify")
                .param("message", ValueType::String)
                .void()
                .sync_handler(|_, _| Ok("ignored")),
            false,
        );
        let result = adapter.invoke(array(json!(["hello"]))).await.unwrap();
        assert!(result.is_null());
    }

    #[tokio::test]
    async fn test_default_shapes() {
        let ping = adapter(
            MethodBinding::new("ping").sync_handler(|_, _| Ok("pong")),
            false,
        );
        assert_eq!(
            ping.info().shapes,
            vec![ParamsShape::Positional, ParamsShape::Missing]
        );
        assert!(ping.invoke(None).await.is_ok());
        assert!(ping.invoke(array(json!([]))).await.is_ok());
        assert_eq!(
            ping.invoke(array(json!({}))).await.unwrap_err().code,
            INVALID_PARAMS
        );

        let method = adapter(
            MethodBinding::new("method")
                .positional_param(ValueType::Integer)
                .positional_param(ValueType::Integer)
                .sync_handler(|_, _| Ok("result")),
            false,
        );
        assert_eq!(method.info().shapes, vec![ParamsShape::Positional]);
        assert_eq!(
            method.invoke(array(json!({"i": 1, "j": 2}))).await.unwrap_err().code,
            INVALID_PARAMS
        );
    }

    #[tokio::test]
    async fn test_result_not_matching_return_type_is_internal_error() {
        let adapter = adapter(
            MethodBinding::new("broken")
                .returns(ValueType::Integer)
                .sync_handler(|_, _| Ok("not a number")),
            true,
        );
        let err = adapter.invoke(None).await.unwrap_err();
        assert_eq!(err.code, INTERNAL_ERROR);
        assert_eq!(err.data, None);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_unexpected_failure_is_logged_not_sent() {
        let adapter = adapter(
            MethodBinding::new("fails").sync_handler(|_, _| -> Result<(), _> {
                Err(anyhow::anyhow!("connection refused by db-7").into())
            }),
            true,
        );
        let err = adapter.invoke(None).await.unwrap_err();

        assert_eq!(err, JsonRpcErrorObject::internal_error());
        assert!(logs_contain("connection refused by db-7"));
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let adapter = adapter(
            MethodBinding::new("panics").handler(|_, _| async {
                if true {
                    panic!("boom");
                }
                Ok::<_, MethodFailure<Unmapped>>(1)
            }),
            false,
        );
        let err = adapter.invoke(None).await.unwrap_err();
        assert_eq!(err.code, INTERNAL_ERROR);
        assert_eq!(err.message, "Internal error");
    }

    #[test]
    fn test_registration_errors() {
        let no_handler = MethodBinding::<(), Unmapped>::new("a")
            .into_parts(Arc::new(ErrorMapping::empty()))
            .err();
        assert_eq!(no_handler, Some(RegistrationError::MissingHandler("a".into())));

        let unnamed = MethodBinding::<(), Unmapped>::new("b")
            .positional_param(ValueType::Integer)
            .shapes([ParamsShape::Named])
            .sync_handler(|_, _| Ok(()))
            .into_parts(Arc::new(ErrorMapping::empty()))
            .err();
        assert_eq!(
            unnamed,
            Some(RegistrationError::UnnamedParameter {
                method: "b".into(),
                index: 0
            })
        );

        let missing_with_params = MethodBinding::<(), Unmapped>::new("c")
            .param("x", ValueType::Any)
            .shapes([ParamsShape::Missing])
            .sync_handler(|_, _| Ok(()))
            .into_parts(Arc::new(ErrorMapping::empty()))
            .err();
        assert_eq!(
            missing_with_params,
            Some(RegistrationError::MissingShapeWithParameters("c".into()))
        );

        let no_shapes = MethodBinding::<(), Unmapped>::new("d")
            .shapes([])
            .sync_handler(|_, _| Ok(()))
            .into_parts(Arc::new(ErrorMapping::empty()))
            .err();
        assert_eq!(no_shapes, Some(RegistrationError::NoParamsShape("d".into())));

        let duplicate = MethodBinding::<(), Unmapped>::new("e")
            .param("x", ValueType::Any)
            .param("x", ValueType::Any)
            .sync_handler(|_, _| Ok(()))
            .into_parts(Arc::new(ErrorMapping::empty()))
            .err();
        assert_eq!(
            duplicate,
            Some(RegistrationError::DuplicateParameter {
                method: "e".into(),
                name: "x".into()
            })
        );
    }

    #[test]
    fn test_arguments_get() {
        let args = Arguments::new(vec![json!(1), json!("x")]);
        assert_eq!(args.get::<i64>(0).unwrap(), 1);
        assert_eq!(args.get::<String>(1).unwrap(), "x");
        assert_eq!(args.get::<i64>(2), Err(ParamError::Missing(2)));
        assert!(matches!(
            args.get::<i64>(1),
            Err(ParamError::Decode { index: 1, .. })
        ));
    }
}
