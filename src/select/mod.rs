//! Select facade (verb module)
//!
//! Binds a schema, an operator table, and a backend kind into a
//! DataSource, and exposes the composable Select value that carries a
//! projection and a condition through resolution, compilation, and
//! execution.

mod error;
mod select;
mod source;

pub use error::QueryError;
pub use select::{CompiledQuery, QueryArtifact, QueryExecutor, Select};
pub use source::{BackendKind, DataSource};
