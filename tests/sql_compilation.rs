//! Compiling selects for the relational backend

mod common;

use common::load_fixture;
use semsel::{DataSource, Field, QueryArtifact, SqlFilter, Value};

fn warehouse() -> DataSource {
    DataSource::relational("warehouse", load_fixture("weblogs.json"))
}

fn compile_filter(source: &DataSource, query: &str) -> SqlFilter {
    let compiled = source
        .select("*")
        .unwrap()
        .filter(query)
        .unwrap()
        .compile()
        .unwrap();
    match compiled.artifact {
        QueryArtifact::Sql(filter) => filter,
        other => panic!("expected sql artifact, got {:?}", other),
    }
}

#[test]
fn test_semantic_selector_compiles_to_parameterized_or() {
    let filter = compile_filter(&warehouse(), r#"ip == "1.2.3.4""#);
    assert_eq!(
        filter.text,
        "((clientip = :param_clientip_0) OR (serverip = :param_serverip_1))"
    );
    assert_eq!(filter.params["param_clientip_0"], Value::from("1.2.3.4"));
    assert_eq!(filter.params["param_serverip_1"], Value::from("1.2.3.4"));
}

#[test]
fn test_wildcard_value_switches_to_like() {
    let filter = compile_filter(&warehouse(), r#"@useragent == "Mozilla*""#);
    assert_eq!(filter.text, "(useragent LIKE :param_useragent_0)");
    assert_eq!(filter.params["param_useragent_0"], Value::from("Mozilla%"));
}

#[test]
fn test_escaped_wildcard_stays_equality() {
    let filter = compile_filter(&warehouse(), r#"@useragent == "\*literal\*""#);
    assert_eq!(filter.text, "(useragent = :param_useragent_0)");
    assert_eq!(filter.params["param_useragent_0"], Value::from("*literal*"));
}

#[test]
fn test_mixed_boolean_query() {
    let filter = compile_filter(&warehouse(), r#"@status != 200 & @bytes >= 1024"#);
    assert_eq!(
        filter.text,
        "((status <> :param_status_0) AND (bytes >= :param_bytes_1))"
    );
    assert_eq!(filter.params["param_status_0"], Value::Int(200));
    assert_eq!(filter.params["param_bytes_1"], Value::Int(1024));
}

#[test]
fn test_unfiltered_select_emits_no_where_text() {
    let compiled = warehouse().select("*").unwrap().compile().unwrap();
    match compiled.artifact {
        QueryArtifact::Sql(filter) => {
            assert_eq!(filter.text, "");
            assert!(filter.params.is_empty());
        }
        other => panic!("expected sql artifact, got {:?}", other),
    }
}

#[test]
fn test_projection_resolves_to_sorted_fields() {
    let compiled = warehouse()
        .select("client:, @status")
        .unwrap()
        .compile()
        .unwrap();
    assert_eq!(
        compiled.projection,
        vec![
            Field::new("clientip"),
            Field::new("status"),
            Field::new("useragent"),
        ]
    );
}

#[test]
fn test_value_set_compiles_per_value_params() {
    let filter = compile_filter(&warehouse(), "@status == {200, 304}");
    assert_eq!(
        filter.text,
        "((status = :param_status_0) OR (status = :param_status_1))"
    );
    assert_eq!(filter.params["param_status_0"], Value::Int(200));
    assert_eq!(filter.params["param_status_1"], Value::Int(304));
}

#[test]
fn test_regex_comparison_compiles_for_sql() {
    let filter = compile_filter(&warehouse(), "@host =~ //^web-[0-9]+$//");
    assert_eq!(filter.text, "(host REGEXP :param_host_0)");
    assert_eq!(filter.params["param_host_0"], Value::from("^web-[0-9]+$"));
}
