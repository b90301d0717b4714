//! Error mapping: application error kinds to protocol error objects.
//!
//! Rules live at two levels. Receiver-level rules apply to every method a
//! receiver exposes, method-level rules to one method only. A raised kind is
//! resolved by walking its parent chain: the closest ancestor with a
//! method-level rule wins, then the closest ancestor with a receiver-level
//! rule, and otherwise the failure becomes `Internal error`.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::{JsonRpcErrorObject, RegistrationError};

/// An application error kind, optionally nested under a parent kind.
///
/// ```rust
/// use jsonrpc_activator::ErrorKind;
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// enum AppError {
///     Runtime,
///     IllegalState,
/// }
///
/// impl ErrorKind for AppError {
///     fn parent(&self) -> Option<Self> {
///         match self {
///             AppError::IllegalState => Some(AppError::Runtime),
///             AppError::Runtime => None,
///         }
///     }
/// }
/// ```
pub trait ErrorKind: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    fn parent(&self) -> Option<Self> {
        None
    }
}

/// Kind type for dispatchers that never map errors. It has no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unmapped {}

impl ErrorKind for Unmapped {}

/// `kind -> (code, message)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRule<K> {
    pub kind: K,
    pub code: i64,
    pub message: String,
}

impl<K: ErrorKind> MappingRule<K> {
    pub fn new(kind: K, code: i64, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
        }
    }

    pub fn to_error_object(&self) -> JsonRpcErrorObject {
        JsonRpcErrorObject::custom(self.code, self.message.clone(), None)
    }
}

/// Scope of a rule set, used in registration errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingScope {
    Method,
    Receiver,
}

impl MappingScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingScope::Method => "method",
            MappingScope::Receiver => "receiver",
        }
    }
}

/// Rules of one scope, at most one per kind.
#[derive(Debug, Clone)]
pub struct ErrorMapping<K> {
    rules: Vec<MappingRule<K>>,
}

impl<K: ErrorKind> ErrorMapping<K> {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn new(rules: Vec<MappingRule<K>>, scope: MappingScope) -> Result<Self, RegistrationError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(&rule.kind) {
                return Err(RegistrationError::DuplicateMappingRule {
                    kind: format!("{:?}", rule.kind),
                    scope: scope.as_str(),
                });
            }
        }
        Ok(Self { rules })
    }

    fn rule_for(&self, kind: &K) -> Option<&MappingRule<K>> {
        self.rules.iter().find(|rule| &rule.kind == kind)
    }

    /// The rule for `kind` or its closest ancestor.
    pub fn closest(&self, kind: &K) -> Option<&MappingRule<K>> {
        if self.rules.is_empty() {
            return None;
        }
        let mut visited = HashSet::new();
        let mut current = Some(kind.clone());
        while let Some(k) = current {
            if let Some(rule) = self.rule_for(&k) {
                return Some(rule);
            }
            let parent = k.parent();
            // a cyclic hierarchy ends the walk instead of looping
            if !visited.insert(k) {
                break;
            }
            current = parent;
        }
        None
    }
}

impl<K: ErrorKind> Default for ErrorMapping<K> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Both rule levels a registered method resolves against.
#[derive(Debug, Clone)]
pub struct MethodErrorMapping<K> {
    method: ErrorMapping<K>,
    receiver: Arc<ErrorMapping<K>>,
}

impl<K: ErrorKind> MethodErrorMapping<K> {
    pub fn new(method: ErrorMapping<K>, receiver: Arc<ErrorMapping<K>>) -> Self {
        Self { method, receiver }
    }

    pub fn resolve(&self, kind: &K) -> Option<(&MappingRule<K>, MappingScope)> {
        if let Some(rule) = self.method.closest(kind) {
            return Some((rule, MappingScope::Method));
        }
        self.receiver
            .closest(kind)
            .map(|rule| (rule, MappingScope::Receiver))
    }

    /// Protocol error for a raised kind; unmapped kinds become `Internal error`.
    pub fn error_object(&self, kind: &K) -> JsonRpcErrorObject {
        match self.resolve(kind) {
            Some((rule, _)) => rule.to_error_object(),
            None => JsonRpcErrorObject::internal_error(),
        }
    }
}

impl<K: ErrorKind> Default for MethodErrorMapping<K> {
    fn default() -> Self {
        Self::new(ErrorMapping::empty(), Arc::new(ErrorMapping::empty()))
    }
}
