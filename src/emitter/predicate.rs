//! In-memory emitter
//!
//! Transforms a resolved condition tree into a native row predicate for
//! the in-memory and distributed-table engines. Regexes and glob patterns
//! compile once at emit time, never per row.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use tracing::debug;

use crate::condition::{Condition, Value};
use crate::model::Field;
use super::error::EmitError;
use super::wildcard;

/// A row as the in-memory engine presents it
pub type Row = BTreeMap<String, Value>;

/// A compiled boolean predicate over rows
pub struct RowPredicate {
    test: Box<dyn Fn(&Row) -> bool + Send + Sync>,
}

impl RowPredicate {
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        RowPredicate { test: Box::new(test) }
    }

    /// Accepts every row; the compiled form of "no filter"
    pub fn always() -> Self {
        RowPredicate::new(|_| true)
    }

    /// Logical AND over a group of predicates
    pub fn all(parts: Vec<RowPredicate>) -> Self {
        RowPredicate::new(move |row| parts.iter().all(|p| p.test(row)))
    }

    /// Logical OR over a group of predicates
    pub fn any(parts: Vec<RowPredicate>) -> Self {
        RowPredicate::new(move |row| parts.iter().any(|p| p.test(row)))
    }

    pub fn test(&self, row: &Row) -> bool {
        (self.test)(row)
    }
}

impl fmt::Debug for RowPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RowPredicate")
    }
}

/// Emit a row predicate from a resolved condition tree
pub fn emit_predicate(condition: &Condition) -> Result<RowPredicate, EmitError> {
    let predicate = emit_condition(condition)?;
    debug!("row predicate emitted");
    Ok(predicate)
}

fn emit_condition(condition: &Condition) -> Result<RowPredicate, EmitError> {
    match condition {
        Condition::True => Ok(RowPredicate::always()),
        Condition::And(parts) => {
            let parts: Vec<RowPredicate> =
                parts.iter().map(emit_condition).collect::<Result<_, _>>()?;
            Ok(RowPredicate::all(parts))
        }
        Condition::Or(parts) => {
            let parts: Vec<RowPredicate> =
                parts.iter().map(emit_condition).collect::<Result<_, _>>()?;
            Ok(RowPredicate::any(parts))
        }
        Condition::Equals { field, value } => emit_equals(field, value),
        Condition::NotEqual { field, value } => {
            let expected = literal(value)?;
            let field = field.to_string();
            Ok(RowPredicate::new(move |row| {
                row.get(&field).is_some_and(|v| !value_eq(v, &expected))
            }))
        }
        Condition::GreaterThan { field, value } => emit_ordering(field, value, &[Ordering::Greater]),
        Condition::GreaterThanEqualTo { field, value } => {
            emit_ordering(field, value, &[Ordering::Greater, Ordering::Equal])
        }
        Condition::LessThan { field, value } => emit_ordering(field, value, &[Ordering::Less]),
        Condition::LessThanEqualTo { field, value } => {
            emit_ordering(field, value, &[Ordering::Less, Ordering::Equal])
        }
        Condition::Matches { field, value } => {
            let pattern = match value {
                Value::Regex(pattern) | Value::Str(pattern) => pattern.clone(),
                Value::Var(name) => return Err(EmitError::UnboundVariable(name.clone())),
                other => {
                    return Err(EmitError::Unresolved(format!(
                        "regex comparison against {}",
                        other
                    )));
                }
            };
            let regex = compile(&pattern)?;
            let field = field.to_string();
            Ok(RowPredicate::new(move |row| {
                row.get(&field).is_some_and(|v| regex.is_match(&v.to_string()))
            }))
        }
        Condition::Generic { lhs, op, .. } => {
            Err(EmitError::Unresolved(format!("{} {} ...", lhs, op)))
        }
        Condition::GenericSet { lhs, op, .. } => {
            Err(EmitError::Unresolved(format!("{} {} {{...}}", lhs, op)))
        }
    }
}

/// Equality, glob-aware for string values the way the relational emitter
/// switches to LIKE
fn emit_equals(field: &Field, value: &Value) -> Result<RowPredicate, EmitError> {
    let field = field.to_string();
    if let Value::Str(s) = value {
        if wildcard::has_wildcard(s) {
            let regex = compile(&wildcard::to_regex_source(s))?;
            return Ok(RowPredicate::new(move |row| {
                row.get(&field).is_some_and(|v| regex.is_match(&v.to_string()))
            }));
        }
        let expected = Value::Str(wildcard::unescape(s));
        return Ok(RowPredicate::new(move |row| {
            row.get(&field).is_some_and(|v| value_eq(v, &expected))
        }));
    }
    let expected = literal(value)?;
    Ok(RowPredicate::new(move |row| {
        row.get(&field).is_some_and(|v| value_eq(v, &expected))
    }))
}

fn emit_ordering(
    field: &Field,
    value: &Value,
    accepted: &'static [Ordering],
) -> Result<RowPredicate, EmitError> {
    let expected = literal(value)?;
    let field = field.to_string();
    Ok(RowPredicate::new(move |row| {
        row.get(&field)
            .and_then(|v| v.compare(&expected))
            .is_some_and(|ordering| accepted.contains(&ordering))
    }))
}

/// Values are equal when identical, or when they order as numeric equals
/// (so `Int(1)` matches `Float(1.0)`)
fn value_eq(actual: &Value, expected: &Value) -> bool {
    actual == expected || actual.compare(expected) == Some(Ordering::Equal)
}

fn literal(value: &Value) -> Result<Value, EmitError> {
    match value {
        Value::Var(name) => Err(EmitError::UnboundVariable(name.clone())),
        other => Ok(other.clone()),
    }
}

fn compile(source: &str) -> Result<Regex, EmitError> {
    Regex::new(source).map_err(|e| EmitError::InvalidRegex {
        pattern: source.to_string(),
        source: e,
    })
}
