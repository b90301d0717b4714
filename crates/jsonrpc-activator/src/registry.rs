//! Receivers and the method-name lookup table.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::codec::ValueCodec;
use crate::error::{ErrorDataFactory, RegistrationError};
use crate::mapping::{ErrorKind, ErrorMapping, MappingRule, MappingScope};
use crate::method::{Arguments, Handler, Invoker, MethodAdapter, MethodBinding, MethodResult};

type Factory<R> = Arc<dyn Fn() -> R + Send + Sync>;

/// A receiver factory, its receiver-level error rules and its method bindings.
///
/// The factory runs once per call and the receiver it returns is moved into
/// the method body. Receivers that share state should hold it behind an `Arc`.
pub struct ReceiverBindings<R, K: ErrorKind> {
    factory: Factory<R>,
    rules: Vec<MappingRule<K>>,
    methods: Vec<MethodBinding<R, K>>,
}

impl<R, K> ReceiverBindings<R, K>
where
    R: Send + 'static,
    K: ErrorKind,
{
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            rules: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Receiver-level rule, applied to every method unless a method rule matches first.
    pub fn error_rule(mut self, kind: K, code: i64, message: impl Into<String>) -> Self {
        self.rules.push(MappingRule::new(kind, code, message));
        self
    }

    pub fn method(mut self, binding: MethodBinding<R, K>) -> Self {
        self.methods.push(binding);
        self
    }

    pub fn methods(mut self, bindings: impl IntoIterator<Item = MethodBinding<R, K>>) -> Self {
        self.methods.extend(bindings);
        self
    }
}

/// Registration deferred until the dispatcher's codec and settings are final.
pub(crate) trait PendingReceiver<K: ErrorKind>: Send {
    fn bind(
        self: Box<Self>,
        codec: &Arc<dyn ValueCodec>,
        error_data: ErrorDataFactory,
    ) -> Result<Vec<MethodAdapter<K>>, RegistrationError>;
}

impl<R, K> PendingReceiver<K> for ReceiverBindings<R, K>
where
    R: Send + 'static,
    K: ErrorKind,
{
    fn bind(
        self: Box<Self>,
        codec: &Arc<dyn ValueCodec>,
        error_data: ErrorDataFactory,
    ) -> Result<Vec<MethodAdapter<K>>, RegistrationError> {
        let this = *self;
        let receiver_rules = Arc::new(ErrorMapping::new(this.rules, MappingScope::Receiver)?);
        let factory = this.factory;

        this.methods
            .into_iter()
            .map(|binding| -> Result<MethodAdapter<K>, RegistrationError> {
                let (info, handler) = binding.into_parts(receiver_rules.clone())?;
                let invoker = ReceiverInvoker {
                    factory: factory.clone(),
                    handler,
                };
                Ok(MethodAdapter::new(
                    info,
                    Arc::new(invoker),
                    codec.clone(),
                    error_data,
                ))
            })
            .collect()
    }
}

struct ReceiverInvoker<R, K> {
    factory: Factory<R>,
    handler: Handler<R, K>,
}

#[async_trait]
impl<R, K> Invoker<K> for ReceiverInvoker<R, K>
where
    R: Send + 'static,
    K: ErrorKind,
{
    async fn invoke(&self, args: Arguments) -> MethodResult<K> {
        let receiver = (self.factory)();
        (self.handler)(receiver, args).await
    }
}

/// Method name to adapter. Built once, read-only afterwards.
pub struct MethodRegistry<K: ErrorKind> {
    methods: HashMap<String, Arc<MethodAdapter<K>>>,
}

impl<K: ErrorKind> MethodRegistry<K> {
    pub fn new(adapters: Vec<MethodAdapter<K>>) -> Result<Self, RegistrationError> {
        let mut methods = HashMap::with_capacity(adapters.len());
        for adapter in adapters {
            let name = adapter.info().name.clone();
            if methods.contains_key(&name) {
                return Err(RegistrationError::DuplicateMethod(name));
            }
            debug!(
                method = %name,
                shapes = ?adapter.info().shapes,
                "bound JSON-RPC method"
            );
            methods.insert(name, Arc::new(adapter));
        }
        Ok(Self { methods })
    }

    pub fn lookup(&self, method: &str) -> Option<&Arc<MethodAdapter<K>>> {
        self.methods.get(method)
    }

    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    /// Registered method names, sorted.
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
