//! Schema errors

use std::fmt;

/// Errors raised while loading a declarative schema or configuring a source
#[derive(Debug)]
pub enum SchemaError {
    /// IO error reading a schema file
    Io {
        path: String,
        source: std::io::Error,
    },
    /// JSON deserialization error
    Json { source: serde_json::Error },
    /// The schema document is not a JSON object
    NotAnObject,
    /// A field is annotated with something other than a tags/dim object
    InvalidAnnotation { field: String, message: String },
    /// An operator table entry uses a token outside the query grammar
    UnknownOperatorToken(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::Io { path, source } => {
                write!(f, "Failed to read '{}': {}", path, source)
            }
            SchemaError::Json { source } => {
                write!(f, "Invalid JSON: {}", source)
            }
            SchemaError::NotAnObject => {
                write!(f, "Schema must be a JSON object mapping field names to annotations")
            }
            SchemaError::InvalidAnnotation { field, message } => {
                write!(f, "Invalid annotation for field '{}': {}", field, message)
            }
            SchemaError::UnknownOperatorToken(token) => {
                write!(f, "Operator token '{}' is not part of the query grammar", token)
            }
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SchemaError::Io { source, .. } => Some(source),
            SchemaError::Json { source } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::Json { source: err }
    }
}
