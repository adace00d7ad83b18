//! Semantic schema model (noun module)
//!
//! The vocabulary a query is written in (tags, dimensions) and the
//! per-backend schema (TableMetadata) that maps that vocabulary onto
//! physical field names.

mod annotation;
mod error;
mod metadata;

pub use annotation::{Dim, Field, Selector, Tag, TaggedDim};
pub use error::SchemaError;
pub use metadata::TableMetadata;
