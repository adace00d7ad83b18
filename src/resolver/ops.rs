//! Operator tables: token -> concrete condition constructor

use std::collections::BTreeMap;

use crate::condition::{Condition, Value};
use crate::model::{Field, SchemaError};

/// Constructor for one concrete comparison variant
pub type OperatorFn = fn(Field, Value) -> Condition;

/// The comparison tokens the grammar knows
const GRAMMAR_TOKENS: [&str; 7] = ["==", "!=", ">", ">=", "<", "<=", "=~"];

/// One backend's operator support, keyed by grammar token
///
/// Built once per data source at configuration time and immutable
/// afterwards. Tokens are validated against the grammar on construction,
/// so a table can restrict what a backend supports but never extend the
/// query language.
#[derive(Debug, Clone)]
pub struct OperatorTable {
    backend: String,
    entries: BTreeMap<String, OperatorFn>,
}

impl OperatorTable {
    /// Build a table from explicit token/constructor pairs
    pub fn new<I, S>(backend: S, entries: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (String, OperatorFn)>,
        S: Into<String>,
    {
        let entries: BTreeMap<String, OperatorFn> = entries.into_iter().collect();
        for token in entries.keys() {
            if !GRAMMAR_TOKENS.contains(&token.as_str()) {
                return Err(SchemaError::UnknownOperatorToken(token.clone()));
            }
        }
        Ok(OperatorTable {
            backend: backend.into(),
            entries,
        })
    }

    /// A table supporting every grammar token
    pub fn full<S: Into<String>>(backend: S) -> Self {
        let entries: BTreeMap<String, OperatorFn> = [
            ("==".to_string(), Condition::equals as OperatorFn),
            ("!=".to_string(), Condition::not_equal as OperatorFn),
            (">".to_string(), Condition::greater_than as OperatorFn),
            (">=".to_string(), Condition::greater_than_equal_to as OperatorFn),
            ("<".to_string(), Condition::less_than as OperatorFn),
            ("<=".to_string(), Condition::less_than_equal_to as OperatorFn),
            ("=~".to_string(), Condition::matches as OperatorFn),
        ]
        .into_iter()
        .collect();
        OperatorTable {
            backend: backend.into(),
            entries,
        }
    }

    /// Drop support for one token
    pub fn without(mut self, token: &str) -> Self {
        self.entries.remove(token);
        self
    }

    /// The backend this table belongs to, for error reporting
    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn supports(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    pub fn constructor(&self, token: &str) -> Option<OperatorFn> {
        self.entries.get(token).copied()
    }
}
