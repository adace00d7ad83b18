//! Backend emitters (verb module)
//!
//! One compiler per physical source kind, each a recursive function from a
//! resolved condition tree to that backend's native query artifact:
//! parameterized SQL WHERE text, a search-language boolean expression, or
//! an in-memory row predicate.
//!
//! Emitters share no state; the SQL parameter-name counter lives inside a
//! single emit call, so concurrent emissions never interfere.

mod error;
mod predicate;
mod search;
mod sql;
mod wildcard;

pub use error::EmitError;
pub use predicate::{emit_predicate, Row, RowPredicate};
pub use search::emit_expr;
pub use sql::{emit_filter, SqlFilter};
