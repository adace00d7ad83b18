//! Resolution pipeline (verb module)
//!
//! Rewrites a raw condition tree into one containing only concrete,
//! backend-supported predicates, in four ordered passes:
//!
//! 1. Tagged-dim expansion - selector patterns become Or-groups of
//!    concrete fields
//! 2. Operator lowering - generic comparisons become the backend's
//!    concrete variants via its operator table
//! 3. Conjunction flattening - nested Ands are unnested and normalized
//! 4. Field validation - every field leaf is checked against the schema,
//!    reporting all unknowns at once
//!
//! Resolution is pure and idempotent; the input tree is never mutated.

mod error;
mod ops;
mod resolve;

pub use error::ResolveError;
pub use ops::{OperatorFn, OperatorTable};
pub use resolve::{resolve, resolve_projection};
