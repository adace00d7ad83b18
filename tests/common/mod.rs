//! Shared test utilities for integration tests
#![allow(dead_code)]

use semsel::{CompiledQuery, QueryArtifact, QueryExecutor, Row, TableMetadata, Value};

/// Route pipeline debug events to stderr; set RUST_LOG to see them
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Load a schema fixture from the tests/test_data directory
pub fn load_fixture(name: &str) -> TableMetadata {
    let path = format!("tests/test_data/{}", name);
    TableMetadata::from_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load test data {}: {}", name, e))
}

/// Build a row from field/value pairs
pub fn row(entries: &[(&str, Value)]) -> Row {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

/// A small weblog table matching the weblogs.json fixture
pub fn weblog_rows() -> Vec<Row> {
    vec![
        row(&[
            ("clientip", Value::from("10.0.0.1")),
            ("serverip", Value::from("192.168.1.10")),
            ("status", Value::Int(200)),
            ("bytes", Value::Int(5120)),
            ("host", Value::from("web-01")),
            ("useragent", Value::from("Mozilla/5.0")),
        ]),
        row(&[
            ("clientip", Value::from("10.0.0.2")),
            ("serverip", Value::from("192.168.1.10")),
            ("status", Value::Int(404)),
            ("bytes", Value::Int(312)),
            ("host", Value::from("web-02")),
            ("useragent", Value::from("curl/8.4")),
        ]),
        row(&[
            ("clientip", Value::from("172.16.0.9")),
            ("serverip", Value::from("192.168.1.11")),
            ("status", Value::Int(500)),
            ("bytes", Value::Int(64)),
            ("host", Value::from("db-01")),
            ("useragent", Value::from("Mozilla/5.0")),
        ]),
    ]
}

/// In-memory executor: applies a predicate artifact to a fixed row set
/// and projects the requested fields
pub struct MemoryExecutor {
    rows: Vec<Row>,
}

impl MemoryExecutor {
    pub fn new(rows: Vec<Row>) -> Self {
        MemoryExecutor { rows }
    }
}

impl QueryExecutor for MemoryExecutor {
    fn execute(
        &self,
        query: &CompiledQuery,
    ) -> Result<Vec<Row>, Box<dyn std::error::Error + Send + Sync>> {
        let QueryArtifact::Predicate(predicate) = &query.artifact else {
            return Err("memory executor requires a predicate artifact".into());
        };
        let selected = self
            .rows
            .iter()
            .filter(|row| predicate.test(row))
            .map(|row| {
                row.iter()
                    .filter(|(name, _)| query.projection.iter().any(|f| f.as_str() == *name))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect()
            })
            .collect();
        Ok(selected)
    }
}
