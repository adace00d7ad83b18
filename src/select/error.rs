//! The umbrella error a Select caller sees

use std::fmt;

use crate::emitter::EmitError;
use crate::model::SchemaError;
use crate::parser::ParseError;
use crate::resolver::ResolveError;

/// Any failure on the way from query text to executed rows
///
/// Core errors pass through unmodified; nothing is swallowed or retried
/// here. Retry and backoff belong to the executor behind the
/// `QueryExecutor` seam.
#[derive(Debug)]
pub enum QueryError {
    Parse(ParseError),
    Schema(SchemaError),
    Resolve(ResolveError),
    Emit(EmitError),
    Execution(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Parse(err) => write!(f, "{}", err),
            QueryError::Schema(err) => write!(f, "{}", err),
            QueryError::Resolve(err) => write!(f, "{}", err),
            QueryError::Emit(err) => write!(f, "{}", err),
            QueryError::Execution(err) => write!(f, "Query execution failed: {}", err),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::Parse(err) => Some(err),
            QueryError::Schema(err) => Some(err),
            QueryError::Resolve(err) => Some(err),
            QueryError::Emit(err) => Some(err),
            QueryError::Execution(err) => Some(err.as_ref()),
        }
    }
}

impl From<ParseError> for QueryError {
    fn from(err: ParseError) -> Self {
        QueryError::Parse(err)
    }
}

impl From<SchemaError> for QueryError {
    fn from(err: SchemaError) -> Self {
        QueryError::Schema(err)
    }
}

impl From<ResolveError> for QueryError {
    fn from(err: ResolveError) -> Self {
        QueryError::Resolve(err)
    }
}

impl From<EmitError> for QueryError {
    fn from(err: EmitError) -> Self {
        QueryError::Emit(err)
    }
}
