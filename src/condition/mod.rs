//! Condition algebra (noun module)
//!
//! The immutable boolean predicate tree a query is expressed in, and the
//! literal values that appear at its leaves. Trees are built by the parser,
//! rewritten by the resolver, and compiled by the emitters; no stage
//! mutates a tree in place.

mod tree;
mod value;

pub use tree::{Condition, Operand, UnboundVar};
pub use value::Value;
