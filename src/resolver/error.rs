//! Resolver errors

use std::fmt;

use crate::condition::UnboundVar;

/// Errors that can occur while resolving a condition or projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A tag/dim selector matched no fields in the schema
    SelectorNotFound(String),
    /// An operator token has no entry in the backend's operator table
    UnsupportedOperator { op: String, backend: String },
    /// Field references absent from the schema; carries every offender
    UnknownFields(Vec<String>),
    /// A `{name}` template variable with no binding
    UnboundVariable(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::SelectorNotFound(selector) => {
                write!(f, "Selector '{}' matches no fields in the schema", selector)
            }
            ResolveError::UnsupportedOperator { op, backend } => {
                write!(f, "Operator '{}' is not supported by the {} backend", op, backend)
            }
            ResolveError::UnknownFields(fields) => {
                write!(f, "Unknown fields: {}", fields.join(", "))
            }
            ResolveError::UnboundVariable(name) => {
                write!(f, "No binding for variable '{{{}}}'", name)
            }
        }
    }
}

impl std::error::Error for ResolveError {}

impl From<UnboundVar> for ResolveError {
    fn from(err: UnboundVar) -> Self {
        ResolveError::UnboundVariable(err.0)
    }
}
