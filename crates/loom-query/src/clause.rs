//! Projection and grouping clauses of a [`crate::Query`].

use serde::{Deserialize, Serialize};

use crate::filter::Filter;

const WILDCARD_SUFFIX: &str = ".*";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectClause {
    pub fields: Vec<String>,
    pub distinct: bool,
}

impl SelectClause {
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        SelectClause {
            fields: fields.into_iter().map(Into::into).collect(),
            distinct: false,
        }
    }

    /// Projects every field of `collection` (`<collection>.*`).
    pub fn all_of(collection: &str) -> Self {
        SelectClause::new([format!("{collection}{WILDCARD_SUFFIX}")])
    }

    /// True when the projection is a single collection-scoped wildcard.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.fields.as_slice(), [field] if field.ends_with(WILDCARD_SUFFIX))
    }
}

/// GROUP BY fields plus the filter applied after aggregation (HAVING).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupClause {
    pub fields: Vec<String>,
    pub filter: Filter,
}

impl GroupClause {
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        GroupClause {
            fields: fields.into_iter().map(Into::into).collect(),
            filter: Filter::Empty,
        }
    }
}
