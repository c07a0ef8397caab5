//! Query intermediate representation.
//!
//! A [`Query`] accumulates selection, joins, filtering, grouping, sorting and
//! pagination through value-returning builder calls. [`Filter`] trees are
//! built with the constructors in [`filter`]. Nothing here talks to a
//! database: translators walk the public fields and produce statements.

mod build;
mod clause;
pub mod filter;
mod join;
mod operator;
mod query;
mod sort;

pub use bson::Bson;
pub use build::{Build, Limit, Offset};
pub use clause::{GroupClause, SelectClause};
pub use filter::{Comparison, Filter, Fragment, LogicalOp};
pub use join::{Correlation, DEFAULT_JOIN_MODE, JoinClause};
pub use operator::Operator;
pub use query::Query;
pub use sort::{Sort, SortDirection};

/// Starts a query on `collection`. Same as [`Query::new`].
pub fn from(collection: impl Into<String>) -> Query {
    Query::new(collection)
}

/// A query with only a WHERE tree set. Same as [`Query::filtered`].
pub fn filtered(filters: impl IntoIterator<Item = Filter>) -> Query {
    Query::filtered(filters)
}
