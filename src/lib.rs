//! semsel - Compile semantic field selectors into backend-native query predicates
//!
//! This library provides:
//! - Semantic schema types (Tag, Dim, Field, TaggedDim, TableMetadata)
//! - Schema loading from declarative JSON
//! - A condition algebra and the query DSL parser that produces it
//! - Per-source resolution of selectors into concrete predicates
//! - Backend emitters (parameterized SQL, search expressions, row predicates)
//! - A composable Select facade over one data source
//!
//! # Architecture
//!
//! **Noun modules** (data structures):
//! - `model/` - the semantic vocabulary and per-backend schema
//! - `condition/` - the immutable boolean predicate tree and its literals
//!
//! **Verb modules** (transformations):
//! - `parser/` - query text → raw Condition / selector list
//! - `resolver/` - raw Condition + TableMetadata + operator table → concrete Condition
//! - `emitter/` - concrete Condition → native query artifact
//! - `select/` - DataSource configuration and the Select pipeline facade
//!
//! # Example
//!
//! ```ignore
//! use semsel::{DataSource, TableMetadata};
//!
//! let metadata = TableMetadata::from_file("weblogs.json")?;
//! let source = DataSource::relational("warehouse", metadata);
//! let rows = source
//!     .select("client:ip, @status")?
//!     .filter(r#"ip == "10.1.2.3" & @status != 200"#)?
//!     .run(&executor)?;
//! ```

pub mod model;
pub mod condition;
pub mod parser;
pub mod resolver;
pub mod emitter;
pub mod select;

// Re-export commonly used types
pub use model::{Dim, Field, SchemaError, Selector, TableMetadata, Tag, TaggedDim};
pub use condition::{Condition, Operand, Value};
pub use parser::{parse_condition, parse_selector_list, ParseError};
pub use resolver::{resolve, resolve_projection, OperatorTable, ResolveError};
pub use emitter::{emit_expr, emit_filter, emit_predicate, EmitError, Row, RowPredicate, SqlFilter};
pub use select::{BackendKind, CompiledQuery, DataSource, QueryArtifact, QueryError, QueryExecutor, Select};
