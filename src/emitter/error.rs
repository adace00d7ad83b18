//! Emitter errors

use std::fmt;

#[derive(Debug)]
pub enum EmitError {
    /// A generic placeholder reached the emitter; the tree was not resolved
    Unresolved(String),
    /// A `{name}` template variable survived to emission
    UnboundVariable(String),
    /// The backend has no regex comparison
    RegexNotSupported { backend: String },
    /// A regex literal failed to compile
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitError::Unresolved(leaf) => {
                write!(f, "Unresolved condition reached the emitter: {}", leaf)
            }
            EmitError::UnboundVariable(name) => {
                write!(f, "No binding for variable '{{{}}}'", name)
            }
            EmitError::RegexNotSupported { backend } => {
                write!(f, "The {} backend has no regex comparison", backend)
            }
            EmitError::InvalidRegex { pattern, source } => {
                write!(f, "Invalid regex '{}': {}", pattern, source)
            }
        }
    }
}

impl std::error::Error for EmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EmitError::InvalidRegex { source, .. } => Some(source),
            _ => None,
        }
    }
}
