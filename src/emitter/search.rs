//! Search-service emitter
//!
//! Transforms a resolved condition tree into a single boolean expression
//! string for a log-search service. The search language has native
//! wildcards, so `*` passes through verbatim and `\*` unescapes to a
//! literal star.

use tracing::debug;

use crate::condition::{Condition, Value};
use crate::model::Field;
use super::error::EmitError;
use super::wildcard;

/// Emit a search boolean expression from a resolved condition tree
///
/// `True` emits the empty string: no filter clause.
pub fn emit_expr(condition: &Condition) -> Result<String, EmitError> {
    let expr = emit_condition(condition)?;
    debug!(len = expr.len(), "search expression emitted");
    Ok(expr)
}

fn emit_condition(condition: &Condition) -> Result<String, EmitError> {
    match condition {
        Condition::True => Ok(String::new()),
        Condition::And(parts) => emit_group(parts, " AND "),
        Condition::Or(parts) => emit_group(parts, " OR "),
        Condition::Equals { field, value } => emit_comparison(field, "=", value),
        Condition::NotEqual { field, value } => emit_comparison(field, "!=", value),
        Condition::GreaterThan { field, value } => emit_comparison(field, ">", value),
        Condition::GreaterThanEqualTo { field, value } => emit_comparison(field, ">=", value),
        Condition::LessThan { field, value } => emit_comparison(field, "<", value),
        Condition::LessThanEqualTo { field, value } => emit_comparison(field, "<=", value),
        Condition::Matches { .. } => Err(EmitError::RegexNotSupported {
            backend: "search".to_string(),
        }),
        Condition::Generic { lhs, op, .. } => {
            Err(EmitError::Unresolved(format!("{} {} ...", lhs, op)))
        }
        Condition::GenericSet { lhs, op, .. } => {
            Err(EmitError::Unresolved(format!("{} {} {{...}}", lhs, op)))
        }
    }
}

fn emit_group(parts: &[Condition], joiner: &str) -> Result<String, EmitError> {
    let mut rendered = Vec::new();
    for part in parts {
        let text = emit_condition(part)?;
        if !text.is_empty() {
            rendered.push(text);
        }
    }
    match rendered.len() {
        0 => Ok(String::new()),
        1 => Ok(rendered.remove(0)),
        _ => Ok(format!("({})", rendered.join(joiner))),
    }
}

fn emit_comparison(field: &Field, op: &str, value: &Value) -> Result<String, EmitError> {
    Ok(format!("({}{}{})", field, op, render_value(value)?))
}

fn render_value(value: &Value) -> Result<String, EmitError> {
    match value {
        Value::Str(s) => {
            let unescaped = wildcard::unescape(s);
            Ok(format!("\"{}\"", unescaped.replace('"', "\\\"")))
        }
        Value::Int(n) => Ok(n.to_string()),
        Value::Float(n) => Ok(n.to_string()),
        Value::Var(name) => Err(EmitError::UnboundVariable(name.clone())),
        Value::Regex(_) => Err(EmitError::RegexNotSupported {
            backend: "search".to_string(),
        }),
    }
}
