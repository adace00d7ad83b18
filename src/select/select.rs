//! The composable query value

use std::collections::BTreeMap;

use tracing::debug;

use crate::condition::{Condition, Value};
use crate::emitter::{emit_expr, emit_filter, emit_predicate, Row, RowPredicate, SqlFilter};
use crate::model::{Field, Selector};
use crate::parser::parse_condition;
use crate::resolver::{resolve, resolve_projection, ResolveError};
use super::error::QueryError;
use super::source::{BackendKind, DataSource};

/// A query being built against one data source
///
/// Every refinement returns a new value; a Select in hand is never
/// mutated, so intermediate states can be kept and branched.
#[derive(Debug, Clone)]
pub struct Select<'a> {
    source: &'a DataSource,
    selectors: Vec<Selector>,
    condition: Condition,
    bindings: BTreeMap<String, Value>,
    options: BTreeMap<String, Value>,
}

impl<'a> Select<'a> {
    pub(crate) fn new(source: &'a DataSource, selectors: Vec<Selector>) -> Self {
        Select {
            source,
            selectors,
            condition: Condition::True,
            bindings: BTreeMap::new(),
            options: BTreeMap::new(),
        }
    }

    /// Conjoin an already-built condition tree
    pub fn where_(mut self, condition: Condition) -> Self {
        self.condition = self.condition.and_with(condition);
        self
    }

    /// Parse query text and conjoin it
    pub fn filter(self, query: &str) -> Result<Self, QueryError> {
        let parsed = parse_condition(query)?;
        Ok(self.where_(parsed))
    }

    /// Bind a `{name}` template variable
    pub fn bind<S, V>(mut self, name: S, value: V) -> Self
    where
        S: Into<String>,
        V: Into<Value>,
    {
        self.bindings.insert(name.into(), value.into());
        self
    }

    /// Attach a backend-specific option, passed through to the executor
    /// uninterpreted (e.g. a search time window or a row limit)
    pub fn option<S, V>(mut self, name: S, value: V) -> Self
    where
        S: Into<String>,
        V: Into<Value>,
    {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Resolve the condition for this source's schema and operators
    pub fn resolve(&self) -> Result<Condition, QueryError> {
        let bound = self
            .condition
            .bind_vars(&self.bindings)
            .map_err(ResolveError::from)?;
        let resolved = resolve(&bound, self.source.metadata(), self.source.operators())?;
        Ok(resolved)
    }

    /// Surface parse/resolution errors without compiling or touching the
    /// backend
    pub fn check(&self) -> Result<(), QueryError> {
        self.resolve()?;
        resolve_projection(&self.selectors, self.source.metadata())?;
        Ok(())
    }

    /// Resolve and emit the backend-native query artifact
    pub fn compile(&self) -> Result<CompiledQuery, QueryError> {
        let condition = self.resolve()?;
        let projection = resolve_projection(&self.selectors, self.source.metadata())?;
        let artifact = match self.source.kind() {
            BackendKind::Relational => QueryArtifact::Sql(emit_filter(&condition)?),
            BackendKind::Search => QueryArtifact::Search(emit_expr(&condition)?),
            BackendKind::Memory => QueryArtifact::Predicate(emit_predicate(&condition)?),
        };
        debug!(
            source = self.source.name(),
            fields = projection.len(),
            "query compiled"
        );
        Ok(CompiledQuery {
            source: self.source.name().to_string(),
            projection,
            artifact,
            options: self.options.clone(),
        })
    }

    /// Compile and hand the artifact to an executor
    pub fn run<E: QueryExecutor>(&self, executor: &E) -> Result<Vec<Row>, QueryError> {
        let compiled = self.compile()?;
        executor.execute(&compiled).map_err(QueryError::Execution)
    }
}

/// A resolved, emitted query ready for its executor
#[derive(Debug)]
pub struct CompiledQuery {
    /// Name of the data source this was compiled for
    pub source: String,
    /// Concrete fields to project, sorted by name
    pub projection: Vec<Field>,
    pub artifact: QueryArtifact,
    /// Backend-specific options, uninterpreted by the core
    pub options: BTreeMap<String, Value>,
}

/// The backend-native form of a compiled condition
#[derive(Debug)]
pub enum QueryArtifact {
    /// WHERE text plus named parameters
    Sql(SqlFilter),
    /// Search-language boolean expression
    Search(String),
    /// Native predicate for a table engine
    Predicate(RowPredicate),
}

/// The execution seam
///
/// Implementors accept a compiled artifact and return rows whose keys
/// match the requested projection. Retry, backoff, and job cancellation
/// live behind this trait, outside the core.
pub trait QueryExecutor {
    fn execute(
        &self,
        query: &CompiledQuery,
    ) -> Result<Vec<Row>, Box<dyn std::error::Error + Send + Sync>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableMetadata;

    fn metadata() -> TableMetadata {
        TableMetadata::from_str(
            r#"{
                "clientip": {"tags": ["client"], "dim": "ip"},
                "serverip": {"tags": ["server"], "dim": "ip"},
                "status": {"dim": "code"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_where_conjoins_and_preserves_the_original() {
        let source = DataSource::memory("cache", metadata());
        let base = source.select("*").unwrap();
        let refined = base
            .clone()
            .filter(r#"ip == "1.2.3.4""#)
            .unwrap()
            .filter("@status == 200")
            .unwrap();

        assert!(base.resolve().unwrap() == Condition::True);
        // ip expands to an Or over clientip/serverip; status stays bare
        let resolved = refined.resolve().unwrap();
        match resolved {
            Condition::And(parts) => {
                assert_eq!(parts.len(), 2);
                assert!(matches!(parts[0], Condition::Or(ref ips) if ips.len() == 2));
            }
            other => panic!("expected a conjunction, got {:?}", other),
        }
    }

    #[test]
    fn test_check_catches_unknown_selector_early() {
        let source = DataSource::search("weblogs", metadata());
        let select = source.select("*").unwrap().filter("port == 443").unwrap();
        let err = select.check().unwrap_err();
        assert!(matches!(
            err,
            QueryError::Resolve(ResolveError::SelectorNotFound(ref s)) if s == "port"
        ));
    }

    #[test]
    fn test_check_catches_unknown_projection_field() {
        let source = DataSource::memory("cache", metadata());
        let select = source.select("@nosuch").unwrap();
        let err = select.check().unwrap_err();
        assert!(matches!(
            err,
            QueryError::Resolve(ResolveError::UnknownFields(ref fields))
                if fields == &["nosuch".to_string()]
        ));
    }

    #[test]
    fn test_bind_flows_into_resolution() {
        let source = DataSource::memory("cache", metadata());
        let select = source
            .select("*")
            .unwrap()
            .filter("client:ip == {target}")
            .unwrap();

        let err = select.check().unwrap_err();
        assert!(matches!(
            err,
            QueryError::Resolve(ResolveError::UnboundVariable(ref name)) if name == "target"
        ));

        let bound = select.bind("target", "9.9.9.9");
        assert_eq!(
            bound.resolve().unwrap(),
            Condition::equals(Field::new("clientip"), Value::from("9.9.9.9"))
        );
    }

    #[test]
    fn test_compile_picks_the_backend_artifact() {
        let relational = DataSource::relational("warehouse", metadata());
        let compiled = relational
            .select("@clientip")
            .unwrap()
            .filter("@status == 200")
            .unwrap()
            .compile()
            .unwrap();
        assert_eq!(compiled.source, "warehouse");
        assert_eq!(compiled.projection, vec![Field::new("clientip")]);
        match compiled.artifact {
            QueryArtifact::Sql(filter) => {
                assert_eq!(filter.text, "(status = :param_status_0)");
            }
            other => panic!("expected sql artifact, got {:?}", other),
        }

        let search = DataSource::search("weblogs", metadata());
        let compiled = search
            .select("*")
            .unwrap()
            .filter("@status != 404")
            .unwrap()
            .compile()
            .unwrap();
        match compiled.artifact {
            QueryArtifact::Search(expr) => assert_eq!(expr, "(status!=404)"),
            other => panic!("expected search artifact, got {:?}", other),
        }
    }

    #[test]
    fn test_options_pass_through_to_the_compiled_query() {
        let source = DataSource::search("weblogs", metadata());
        let compiled = source
            .select("*")
            .unwrap()
            .option("earliest", "-24h")
            .option("max_rows", 1000_i64)
            .compile()
            .unwrap();
        assert_eq!(compiled.options["earliest"], Value::from("-24h"));
        assert_eq!(compiled.options["max_rows"], Value::Int(1000));
    }

    #[test]
    fn test_empty_projection_means_all_fields() {
        let source = DataSource::memory("cache", metadata());
        let compiled = source.select("").unwrap().compile().unwrap();
        assert_eq!(
            compiled.projection,
            vec![
                Field::new("clientip"),
                Field::new("serverip"),
                Field::new("status"),
            ]
        );
    }
}
