//! The condition tree

use std::collections::BTreeMap;
use std::fmt;

use crate::model::{Field, TaggedDim};
use super::value::Value;

/// The left-hand side of a generic comparison: a concrete field or a
/// tag/dim pattern still to be resolved against a schema
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Field(Field),
    Pattern(TaggedDim),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Field(field) => write!(f, "@{}", field),
            Operand::Pattern(pattern) => write!(f, "{}", pattern),
        }
    }
}

/// A node in the boolean predicate tree
///
/// `Generic` and `GenericSet` are backend-agnostic placeholders produced
/// only by the parser; the resolver rewrites them into the concrete
/// comparison variants before any emitter sees the tree.
///
/// Equality is structural, with one deliberate split: `And` and `Or`
/// compare their parts as multisets (order-independent), while the
/// comparison variants compare lhs and rhs in order.
#[derive(Debug, Clone)]
pub enum Condition {
    /// No filter; the identity for conjunction
    True,
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Generic {
        lhs: Operand,
        op: String,
        rhs: Value,
    },
    GenericSet {
        lhs: Operand,
        op: String,
        values: Vec<Value>,
    },
    Equals { field: Field, value: Value },
    NotEqual { field: Field, value: Value },
    GreaterThan { field: Field, value: Value },
    GreaterThanEqualTo { field: Field, value: Value },
    LessThan { field: Field, value: Value },
    LessThanEqualTo { field: Field, value: Value },
    Matches { field: Field, value: Value },
}

impl Condition {
    pub fn equals(field: Field, value: Value) -> Condition {
        Condition::Equals { field, value }
    }

    pub fn not_equal(field: Field, value: Value) -> Condition {
        Condition::NotEqual { field, value }
    }

    pub fn greater_than(field: Field, value: Value) -> Condition {
        Condition::GreaterThan { field, value }
    }

    pub fn greater_than_equal_to(field: Field, value: Value) -> Condition {
        Condition::GreaterThanEqualTo { field, value }
    }

    pub fn less_than(field: Field, value: Value) -> Condition {
        Condition::LessThan { field, value }
    }

    pub fn less_than_equal_to(field: Field, value: Value) -> Condition {
        Condition::LessThanEqualTo { field, value }
    }

    pub fn matches(field: Field, value: Value) -> Condition {
        Condition::Matches { field, value }
    }

    /// Conjoin two conditions, treating `True` as the identity
    ///
    /// Existing `And` nodes are extended rather than nested, so chained
    /// `.filter()` calls build one flat conjunction.
    pub fn and_with(self, other: Condition) -> Condition {
        match (self, other) {
            (Condition::True, other) => other,
            (this, Condition::True) => this,
            (Condition::And(mut parts), Condition::And(more)) => {
                parts.extend(more);
                Condition::And(parts)
            }
            (Condition::And(mut parts), other) => {
                parts.push(other);
                Condition::And(parts)
            }
            (this, Condition::And(mut parts)) => {
                parts.insert(0, this);
                Condition::And(parts)
            }
            (this, other) => Condition::And(vec![this, other]),
        }
    }

    /// Substitute `{name}` template variables from a binding map
    ///
    /// Returns a new tree with every `Value::Var` replaced; a variable
    /// absent from the map is an error.
    pub fn bind_vars(&self, vars: &BTreeMap<String, Value>) -> Result<Condition, UnboundVar> {
        let bind_value = |value: &Value| -> Result<Value, UnboundVar> {
            match value {
                Value::Var(name) => vars
                    .get(name)
                    .cloned()
                    .ok_or_else(|| UnboundVar(name.clone())),
                other => Ok(other.clone()),
            }
        };

        match self {
            Condition::True => Ok(Condition::True),
            Condition::And(parts) => {
                let parts: Vec<Condition> = parts
                    .iter()
                    .map(|p| p.bind_vars(vars))
                    .collect::<Result<_, _>>()?;
                Ok(Condition::And(parts))
            }
            Condition::Or(parts) => {
                let parts: Vec<Condition> = parts
                    .iter()
                    .map(|p| p.bind_vars(vars))
                    .collect::<Result<_, _>>()?;
                Ok(Condition::Or(parts))
            }
            Condition::Generic { lhs, op, rhs } => Ok(Condition::Generic {
                lhs: lhs.clone(),
                op: op.clone(),
                rhs: bind_value(rhs)?,
            }),
            Condition::GenericSet { lhs, op, values } => Ok(Condition::GenericSet {
                lhs: lhs.clone(),
                op: op.clone(),
                values: values.iter().map(bind_value).collect::<Result<_, _>>()?,
            }),
            Condition::Equals { field, value } => Ok(Condition::Equals {
                field: field.clone(),
                value: bind_value(value)?,
            }),
            Condition::NotEqual { field, value } => Ok(Condition::NotEqual {
                field: field.clone(),
                value: bind_value(value)?,
            }),
            Condition::GreaterThan { field, value } => Ok(Condition::GreaterThan {
                field: field.clone(),
                value: bind_value(value)?,
            }),
            Condition::GreaterThanEqualTo { field, value } => Ok(Condition::GreaterThanEqualTo {
                field: field.clone(),
                value: bind_value(value)?,
            }),
            Condition::LessThan { field, value } => Ok(Condition::LessThan {
                field: field.clone(),
                value: bind_value(value)?,
            }),
            Condition::LessThanEqualTo { field, value } => Ok(Condition::LessThanEqualTo {
                field: field.clone(),
                value: bind_value(value)?,
            }),
            Condition::Matches { field, value } => Ok(Condition::Matches {
                field: field.clone(),
                value: bind_value(value)?,
            }),
        }
    }
}

/// Multiset comparison: every part of `a` pairs off with an equal,
/// not-yet-used part of `b`
fn multiset_eq(a: &[Condition], b: &[Condition]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    'next: for part in a {
        for (i, candidate) in b.iter().enumerate() {
            if !used[i] && part == candidate {
                used[i] = true;
                continue 'next;
            }
        }
        return false;
    }
    true
}

impl PartialEq for Condition {
    fn eq(&self, other: &Condition) -> bool {
        use Condition::*;
        match (self, other) {
            (True, True) => true,
            (And(a), And(b)) => multiset_eq(a, b),
            (Or(a), Or(b)) => multiset_eq(a, b),
            (
                Generic { lhs: al, op: ao, rhs: ar },
                Generic { lhs: bl, op: bo, rhs: br },
            ) => al == bl && ao == bo && ar == br,
            (
                GenericSet { lhs: al, op: ao, values: av },
                GenericSet { lhs: bl, op: bo, values: bv },
            ) => al == bl && ao == bo && av == bv,
            (Equals { field: af, value: av }, Equals { field: bf, value: bv })
            | (NotEqual { field: af, value: av }, NotEqual { field: bf, value: bv })
            | (GreaterThan { field: af, value: av }, GreaterThan { field: bf, value: bv })
            | (
                GreaterThanEqualTo { field: af, value: av },
                GreaterThanEqualTo { field: bf, value: bv },
            )
            | (LessThan { field: af, value: av }, LessThan { field: bf, value: bv })
            | (
                LessThanEqualTo { field: af, value: av },
                LessThanEqualTo { field: bf, value: bv },
            )
            | (Matches { field: af, value: av }, Matches { field: bf, value: bv }) => {
                af == bf && av == bv
            }
            _ => false,
        }
    }
}

/// A `{name}` variable with no binding at resolve time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnboundVar(pub String);

impl fmt::Display for UnboundVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No binding for variable '{{{}}}'", self.0)
    }
}

impl std::error::Error for UnboundVar {}
