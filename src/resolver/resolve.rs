//! The four resolution passes

use std::collections::BTreeSet;

use tracing::debug;

use crate::condition::{Condition, Operand};
use crate::model::{Field, Selector, TableMetadata};
use super::error::ResolveError;
use super::ops::OperatorTable;

/// Resolve a raw condition tree into a backend-concrete one
///
/// Runs the four passes in order and returns a new tree; the input is
/// untouched. Re-running on an already-resolved tree is a no-op.
pub fn resolve(
    condition: &Condition,
    metadata: &TableMetadata,
    operators: &OperatorTable,
) -> Result<Condition, ResolveError> {
    // 1. Expand tag/dim selectors into concrete fields
    let expanded = expand_selectors(condition, metadata)?;
    debug!(backend = operators.backend(), "selectors expanded");

    // 2. Lower generic comparisons through the operator table
    let lowered = lower_operators(&expanded, operators)?;
    debug!(backend = operators.backend(), "operators lowered");

    // 3. Unnest conjunctions
    let flattened = flatten_conjunctions(lowered);

    // 4. Validate every field leaf against the schema
    validate_fields(&flattened, metadata)?;

    Ok(flattened)
}

/// Resolve a projection selector list to a sorted set of fields
///
/// An empty list or any `*` entry means every declared field.
pub fn resolve_projection(
    selectors: &[Selector],
    metadata: &TableMetadata,
) -> Result<Vec<Field>, ResolveError> {
    if selectors.is_empty() || selectors.contains(&Selector::All) {
        return Ok(metadata.fields().cloned().collect());
    }

    let mut fields = BTreeSet::new();
    let mut unknown = BTreeSet::new();
    for selector in selectors {
        match selector {
            Selector::Field(field) => {
                if metadata.contains(field) {
                    fields.insert(field.clone());
                } else {
                    unknown.insert(field.to_string());
                }
            }
            Selector::Pattern(pattern) => {
                let matched = metadata.fields_matching(selector);
                if matched.is_empty() {
                    return Err(ResolveError::SelectorNotFound(pattern.to_string()));
                }
                fields.extend(matched);
            }
            Selector::All => {}
        }
    }

    if !unknown.is_empty() {
        return Err(ResolveError::UnknownFields(unknown.into_iter().collect()));
    }
    Ok(fields.into_iter().collect())
}

/// Pass 1: replace every pattern-lhs comparison with its concrete fields
///
/// A pattern matching one field becomes a bare comparison; more than one
/// becomes an Or-group in field name order. Zero matches is fatal.
fn expand_selectors(
    condition: &Condition,
    metadata: &TableMetadata,
) -> Result<Condition, ResolveError> {
    let expand = |pattern: &crate::model::TaggedDim,
                  make: &dyn Fn(Field) -> Condition|
     -> Result<Condition, ResolveError> {
        let mut fields = metadata.fields_matching(&Selector::Pattern(pattern.clone()));
        match fields.len() {
            0 => Err(ResolveError::SelectorNotFound(pattern.to_string())),
            1 => Ok(make(fields.remove(0))),
            _ => Ok(Condition::Or(fields.into_iter().map(|f| make(f)).collect())),
        }
    };

    match condition {
        Condition::And(parts) => {
            let parts: Vec<Condition> = parts
                .iter()
                .map(|p| expand_selectors(p, metadata))
                .collect::<Result<_, _>>()?;
            Ok(Condition::And(parts))
        }
        Condition::Or(parts) => {
            let parts: Vec<Condition> = parts
                .iter()
                .map(|p| expand_selectors(p, metadata))
                .collect::<Result<_, _>>()?;
            Ok(Condition::Or(parts))
        }
        Condition::Generic {
            lhs: Operand::Pattern(pattern),
            op,
            rhs,
        } => expand(pattern, &|field| Condition::Generic {
            lhs: Operand::Field(field),
            op: op.clone(),
            rhs: rhs.clone(),
        }),
        Condition::GenericSet {
            lhs: Operand::Pattern(pattern),
            op,
            values,
        } => expand(pattern, &|field| Condition::GenericSet {
            lhs: Operand::Field(field),
            op: op.clone(),
            values: values.clone(),
        }),
        other => Ok(other.clone()),
    }
}

/// Pass 2: turn generic comparisons into the backend's concrete variants
///
/// A set comparison lowers to `True` when empty, the bare comparison for
/// one value, and an Or-group otherwise.
fn lower_operators(
    condition: &Condition,
    operators: &OperatorTable,
) -> Result<Condition, ResolveError> {
    match condition {
        Condition::And(parts) => {
            let parts: Vec<Condition> = parts
                .iter()
                .map(|p| lower_operators(p, operators))
                .collect::<Result<_, _>>()?;
            Ok(Condition::And(parts))
        }
        Condition::Or(parts) => {
            let parts: Vec<Condition> = parts
                .iter()
                .map(|p| lower_operators(p, operators))
                .collect::<Result<_, _>>()?;
            Ok(Condition::Or(parts))
        }
        Condition::Generic { lhs, op, rhs } => {
            let make = operators.constructor(op).ok_or_else(|| {
                ResolveError::UnsupportedOperator {
                    op: op.clone(),
                    backend: operators.backend().to_string(),
                }
            })?;
            match lhs {
                Operand::Field(field) => Ok(make(field.clone(), rhs.clone())),
                // Pass 1 leaves no patterns behind
                Operand::Pattern(pattern) => {
                    Err(ResolveError::SelectorNotFound(pattern.to_string()))
                }
            }
        }
        Condition::GenericSet { lhs, op, values } => {
            let make = operators.constructor(op).ok_or_else(|| {
                ResolveError::UnsupportedOperator {
                    op: op.clone(),
                    backend: operators.backend().to_string(),
                }
            })?;
            let field = match lhs {
                Operand::Field(field) => field.clone(),
                Operand::Pattern(pattern) => {
                    return Err(ResolveError::SelectorNotFound(pattern.to_string()));
                }
            };
            let mut lowered: Vec<Condition> = values
                .iter()
                .map(|v| make(field.clone(), v.clone()))
                .collect();
            match lowered.len() {
                0 => Ok(Condition::True),
                1 => Ok(lowered.remove(0)),
                _ => Ok(Condition::Or(lowered)),
            }
        }
        other => Ok(other.clone()),
    }
}

/// Pass 3: unnest Ands, drop True parts, and normalize degenerate cases
fn flatten_conjunctions(condition: Condition) -> Condition {
    match condition {
        Condition::And(parts) => {
            let mut flat = Vec::new();
            for part in parts {
                match flatten_conjunctions(part) {
                    Condition::And(inner) => flat.extend(inner),
                    Condition::True => {}
                    other => flat.push(other),
                }
            }
            match flat.len() {
                0 => Condition::True,
                1 => flat.remove(0),
                _ => Condition::And(flat),
            }
        }
        Condition::Or(parts) => {
            Condition::Or(parts.into_iter().map(flatten_conjunctions).collect())
        }
        other => other,
    }
}

/// Pass 4: check every field leaf, reporting all unknowns together
fn validate_fields(condition: &Condition, metadata: &TableMetadata) -> Result<(), ResolveError> {
    let mut unknown = BTreeSet::new();
    collect_unknown_fields(condition, metadata, &mut unknown);
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(ResolveError::UnknownFields(unknown.into_iter().collect()))
    }
}

fn collect_unknown_fields(
    condition: &Condition,
    metadata: &TableMetadata,
    unknown: &mut BTreeSet<String>,
) {
    let mut check = |field: &Field| {
        if !metadata.contains(field) {
            unknown.insert(field.to_string());
        }
    };

    match condition {
        Condition::True => {}
        Condition::And(parts) | Condition::Or(parts) => {
            for part in parts {
                collect_unknown_fields(part, metadata, unknown);
            }
        }
        Condition::Generic { lhs, .. } | Condition::GenericSet { lhs, .. } => {
            if let Operand::Field(field) = lhs {
                check(field);
            }
        }
        Condition::Equals { field, .. }
        | Condition::NotEqual { field, .. }
        | Condition::GreaterThan { field, .. }
        | Condition::GreaterThanEqualTo { field, .. }
        | Condition::LessThan { field, .. }
        | Condition::LessThanEqualTo { field, .. }
        | Condition::Matches { field, .. } => check(field),
    }
}
