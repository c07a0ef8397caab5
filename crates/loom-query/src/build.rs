//! Clause values that know how to apply themselves to a [`Query`].
//!
//! Lets callers assemble clauses separately (from request parameters,
//! shared scopes, ...) and fold them into a query with [`Query::build`].

use serde::{Deserialize, Serialize};

use crate::clause::{GroupClause, SelectClause};
use crate::filter::Filter;
use crate::join::JoinClause;
use crate::query::Query;
use crate::sort::Sort;

pub trait Build {
    fn build(self, query: &mut Query);
}

/// Pagination start, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offset(pub usize);

/// Pagination size, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit(pub usize);

/// ANDed onto the WHERE tree, like [`Query::filter`].
impl Build for Filter {
    fn build(self, query: &mut Query) {
        query.filter = std::mem::take(&mut query.filter).and([self]);
    }
}

/// Appended after existing sort keys.
impl Build for Sort {
    fn build(self, query: &mut Query) {
        query.sort.push(self);
    }
}

impl Build for JoinClause {
    fn build(self, query: &mut Query) {
        query.joins.push(self);
    }
}

impl Build for SelectClause {
    fn build(self, query: &mut Query) {
        query.select = self;
    }
}

impl Build for GroupClause {
    fn build(self, query: &mut Query) {
        query.group = self;
    }
}

impl Build for Offset {
    fn build(self, query: &mut Query) {
        query.offset = (self.0 > 0).then_some(self.0);
    }
}

impl Build for Limit {
    fn build(self, query: &mut Query) {
        query.limit = (self.0 > 0).then_some(self.0);
    }
}

impl<B: Build> Build for Vec<B> {
    fn build(self, query: &mut Query) {
        for part in self {
            part.build(query);
        }
    }
}
