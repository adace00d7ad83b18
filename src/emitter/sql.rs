//! Relational emitter
//!
//! Transforms a resolved condition tree into a parameterized SQL WHERE
//! clause. Values never appear inline; each comparison leaf binds a fresh
//! named parameter.

use std::collections::BTreeMap;

use tracing::debug;

use crate::condition::{Condition, Value};
use crate::model::Field;
use super::error::EmitError;
use super::wildcard;

/// A compiled WHERE clause with its named parameters
///
/// `text` omits the WHERE keyword; an empty string means no filter.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFilter {
    pub text: String,
    pub params: BTreeMap<String, Value>,
}

/// Hands out `param_<field>_<n>` names, unique within one emit call
struct ParamAllocator {
    index: usize,
}

impl ParamAllocator {
    fn new() -> Self {
        ParamAllocator { index: 0 }
    }

    fn next(&mut self, field: &Field) -> String {
        let name = format!("param_{}_{}", field, self.index);
        self.index += 1;
        name
    }
}

/// Emit a WHERE clause from a resolved condition tree
pub fn emit_filter(condition: &Condition) -> Result<SqlFilter, EmitError> {
    let mut params = BTreeMap::new();
    let mut allocator = ParamAllocator::new();
    let text = emit_condition(condition, &mut allocator, &mut params)?;
    debug!(params = params.len(), "sql filter emitted");
    Ok(SqlFilter { text, params })
}

fn emit_condition(
    condition: &Condition,
    allocator: &mut ParamAllocator,
    params: &mut BTreeMap<String, Value>,
) -> Result<String, EmitError> {
    match condition {
        Condition::True => Ok(String::new()),
        Condition::And(parts) => emit_group(parts, " AND ", allocator, params),
        Condition::Or(parts) => emit_group(parts, " OR ", allocator, params),
        Condition::Equals { field, value } => emit_equals(field, value, allocator, params),
        Condition::NotEqual { field, value } => {
            emit_comparison(field, "<>", value, allocator, params)
        }
        Condition::GreaterThan { field, value } => {
            emit_comparison(field, ">", value, allocator, params)
        }
        Condition::GreaterThanEqualTo { field, value } => {
            emit_comparison(field, ">=", value, allocator, params)
        }
        Condition::LessThan { field, value } => {
            emit_comparison(field, "<", value, allocator, params)
        }
        Condition::LessThanEqualTo { field, value } => {
            emit_comparison(field, "<=", value, allocator, params)
        }
        Condition::Matches { field, value } => {
            let pattern = regex_source(value)?;
            let name = allocator.next(field);
            let text = format!("({} REGEXP :{})", field, name);
            params.insert(name, Value::Str(pattern));
            Ok(text)
        }
        Condition::Generic { lhs, op, .. } => {
            Err(EmitError::Unresolved(format!("{} {} ...", lhs, op)))
        }
        Condition::GenericSet { lhs, op, .. } => {
            Err(EmitError::Unresolved(format!("{} {} {{...}}", lhs, op)))
        }
    }
}

fn emit_group(
    parts: &[Condition],
    joiner: &str,
    allocator: &mut ParamAllocator,
    params: &mut BTreeMap<String, Value>,
) -> Result<String, EmitError> {
    let mut rendered = Vec::new();
    for part in parts {
        let text = emit_condition(part, allocator, params)?;
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

/// Equality, switching to LIKE when the value carries a wildcard
fn emit_equals(
    field: &Field,
    value: &Value,
    allocator: &mut ParamAllocator,
    params: &mut BTreeMap<String, Value>,
) -> Result<String, EmitError> {
    if let Value::Str(s) = value {
        let name = allocator.next(field);
        if wildcard::has_wildcard(s) {
            let text = format!("({} LIKE :{})", field, name);
            params.insert(name, Value::Str(wildcard::to_like_pattern(s)));
            return Ok(text);
        }
        let text = format!("({} = :{})", field, name);
        params.insert(name, Value::Str(wildcard::unescape(s)));
        return Ok(text);
    }
    emit_comparison(field, "=", value, allocator, params)
}

fn emit_comparison(
    field: &Field,
    sql_op: &str,
    value: &Value,
    allocator: &mut ParamAllocator,
    params: &mut BTreeMap<String, Value>,
) -> Result<String, EmitError> {
    if let Value::Var(name) = value {
        return Err(EmitError::UnboundVariable(name.clone()));
    }
    let name = allocator.next(field);
    let text = format!("({} {} :{})", field, sql_op, name);
    params.insert(name, value.clone());
    Ok(text)
}

fn regex_source(value: &Value) -> Result<String, EmitError> {
    match value {
        Value::Regex(pattern) | Value::Str(pattern) => Ok(pattern.clone()),
        Value::Var(name) => Err(EmitError::UnboundVariable(name.clone())),
        other => Err(EmitError::Unresolved(format!("regex comparison against {}", other))),
    }
}
