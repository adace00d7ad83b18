//! Data source configuration

use crate::model::TableMetadata;
use crate::parser::parse_selector_list;
use crate::resolver::OperatorTable;
use super::error::QueryError;
use super::select::Select;

/// The physical source kinds a query can compile for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Parameterized SQL WHERE text
    Relational,
    /// Search-service boolean expression
    Search,
    /// In-memory or distributed-table predicate
    Memory,
}

impl BackendKind {
    /// Short label used in operator tables and error messages
    pub fn label(self) -> &'static str {
        match self {
            BackendKind::Relational => "sql",
            BackendKind::Search => "search",
            BackendKind::Memory => "memory",
        }
    }
}

/// One physical backend: a schema, its operator support, and a name
///
/// Built once per source at configuration time and immutable afterwards.
/// The connection itself lives with the executor, not here.
#[derive(Debug, Clone)]
pub struct DataSource {
    name: String,
    kind: BackendKind,
    metadata: TableMetadata,
    operators: OperatorTable,
}

impl DataSource {
    /// A relational source; supports every comparison operator
    pub fn relational<S: Into<String>>(name: S, metadata: TableMetadata) -> Self {
        let kind = BackendKind::Relational;
        DataSource {
            name: name.into(),
            kind,
            metadata,
            operators: OperatorTable::full(kind.label()),
        }
    }

    /// A log-search source; the search language has no regex comparison
    pub fn search<S: Into<String>>(name: S, metadata: TableMetadata) -> Self {
        let kind = BackendKind::Search;
        DataSource {
            name: name.into(),
            kind,
            metadata,
            operators: OperatorTable::full(kind.label()).without("=~"),
        }
    }

    /// An in-memory or distributed-table source
    pub fn memory<S: Into<String>>(name: S, metadata: TableMetadata) -> Self {
        let kind = BackendKind::Memory;
        DataSource {
            name: name.into(),
            kind,
            metadata,
            operators: OperatorTable::full(kind.label()),
        }
    }

    /// Replace the default operator table
    ///
    /// The table has already been validated against the grammar by
    /// `OperatorTable::new`.
    pub fn with_operators(mut self, operators: OperatorTable) -> Self {
        self.operators = operators;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    /// Start a query against this source
    ///
    /// `selectors` is a projection list: `*`, or comma-separated selectors
    /// and `@field` references. An empty string selects every field.
    pub fn select(&self, selectors: &str) -> Result<Select<'_>, QueryError> {
        let selectors = parse_selector_list(selectors)?;
        Ok(Select::new(self, selectors))
    }
}
