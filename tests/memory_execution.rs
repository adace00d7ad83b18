//! End-to-end selects against the in-memory engine

mod common;

use common::{init_tracing, load_fixture, weblog_rows, MemoryExecutor};
use semsel::{DataSource, Value};

fn cache() -> DataSource {
    init_tracing();
    DataSource::memory("session_cache", load_fixture("weblogs.json"))
}

fn executor() -> MemoryExecutor {
    MemoryExecutor::new(weblog_rows())
}

#[test]
fn test_semantic_selector_filters_rows() {
    let rows = cache()
        .select("*")
        .unwrap()
        .filter(r#"ip == "192.168.1.10""#)
        .unwrap()
        .run(&executor())
        .unwrap();
    // Two rows hit serverip 192.168.1.10; none hit clientip
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_projection_narrows_returned_fields() {
    let rows = cache()
        .select("@clientip, @status")
        .unwrap()
        .filter("@status == 200")
        .unwrap()
        .run(&executor())
        .unwrap();
    assert_eq!(rows.len(), 1);
    let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["clientip", "status"]);
    assert_eq!(rows[0]["clientip"], Value::from("10.0.0.1"));
}

#[test]
fn test_numeric_range_query() {
    let rows = cache()
        .select("*")
        .unwrap()
        .filter("size:count > 300 & size:count < 1000")
        .unwrap()
        .run(&executor())
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["bytes"], Value::Int(312));
}

#[test]
fn test_regex_match_runs_in_memory() {
    let rows = cache()
        .select("@host")
        .unwrap()
        .filter("@host =~ //^web-[0-9]+$//")
        .unwrap()
        .run(&executor())
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_glob_equality_matches_rows() {
    let rows = cache()
        .select("*")
        .unwrap()
        .filter(r#"@useragent == "Mozilla*""#)
        .unwrap()
        .run(&executor())
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_negation_excludes_rows() {
    let rows = cache()
        .select("*")
        .unwrap()
        .filter("!(@status == 404) & !(@status == 500)")
        .unwrap()
        .run(&executor())
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], Value::Int(200));
}

#[test]
fn test_negated_set_flips_the_operator_only() {
    // `!` over a set comparison flips `==` to `!=`; the set still expands
    // to an Or-group, so any row missing at least one listed value passes
    let rows = cache()
        .select("*")
        .unwrap()
        .filter("!(@status == {404, 500})")
        .unwrap()
        .run(&executor())
        .unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn test_bound_variable_flows_to_execution() {
    let rows = cache()
        .select("*")
        .unwrap()
        .filter("client:ip == {target}")
        .unwrap()
        .bind("target", "172.16.0.9")
        .run(&executor())
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], Value::Int(500));
}

#[test]
fn test_unfiltered_select_returns_every_row() {
    let rows = cache().select("*").unwrap().run(&executor()).unwrap();
    assert_eq!(rows.len(), 3);
}
