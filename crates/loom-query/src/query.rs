use bson::Bson;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::build::Build;
use crate::clause::{GroupClause, SelectClause};
use crate::filter::{self, Filter};
use crate::join::{DEFAULT_JOIN_MODE, JoinClause};
use crate::sort::Sort;

/// One logical read request, accumulated through a chain of builder calls.
///
/// Every builder method takes the query by value and hands back the updated
/// query, so a value captured earlier in a chain (for example via `clone`)
/// is never affected by later steps.
///
/// ```
/// use loom_query::{Query, filter::{eq, gt}};
///
/// let query = Query::new("users")
///     .filter([gt("age", 18)])
///     .or_filter([eq("status", "banned")])
///     .sort(["name"])
///     .limit(10);
///
/// assert_eq!(query.collection, "users");
/// assert_eq!(query.limit, Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub collection: String,
    pub select: SelectClause,
    pub joins: Vec<JoinClause>,
    pub filter: Filter,
    pub group: GroupClause,
    pub sort: Vec<Sort>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl Query {
    /// Starts a query on `collection`, projecting all of its fields.
    pub fn new(collection: impl Into<String>) -> Self {
        let collection = collection.into();
        Query {
            select: SelectClause::all_of(&collection),
            collection,
            ..Query::default()
        }
    }

    /// A query carrying only a WHERE tree, for composing reusable filters.
    pub fn filtered(filters: impl IntoIterator<Item = Filter>) -> Self {
        Query {
            filter: filter::and(filters),
            ..Query::default()
        }
    }

    /// Replaces the projection.
    pub fn select<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.select = SelectClause::new(fields);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.select.distinct = true;
        self
    }

    pub fn join(self, collection: impl Into<String>) -> Self {
        self.build(JoinClause::new(collection))
    }

    pub fn join_on(
        self,
        collection: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.join_with(DEFAULT_JOIN_MODE, collection, from, to)
    }

    /// Appends a join with a caller-chosen mode such as `"LEFT JOIN"`.
    pub fn join_with(
        self,
        mode: impl Into<String>,
        collection: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.build(JoinClause::with(mode, collection, from, to))
    }

    pub fn join_fragment(
        self,
        expr: impl Into<String>,
        args: impl IntoIterator<Item = Bson>,
    ) -> Self {
        self.build(JoinClause::fragment(expr, args))
    }

    /// ANDs `filters` onto the WHERE tree.
    pub fn filter(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filter = self.filter.and(filters);
        self
    }

    /// ORs the conjunction of `filters` onto the WHERE tree.
    pub fn or_filter(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filter = self.filter.or([filter::and(filters)]);
        self
    }

    /// Replaces the grouping fields. The HAVING tree is kept.
    pub fn group<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.group.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn having(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.group.filter = self.group.filter.and(filters);
        self
    }

    pub fn or_having(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.group.filter = self.group.filter.or([filter::and(filters)]);
        self
    }

    pub fn sort<S: Into<String>>(self, fields: impl IntoIterator<Item = S>) -> Self {
        self.sort_asc(fields)
    }

    /// Appends ascending sort keys after any existing ones.
    pub fn sort_asc<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.sort.extend(fields.into_iter().map(Sort::asc));
        self
    }

    /// Appends descending sort keys after any existing ones.
    pub fn sort_desc<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.sort.extend(fields.into_iter().map(Sort::desc));
        self
    }

    /// Sets the number of rows to skip. Zero clears the bound.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = (offset > 0).then_some(offset);
        self
    }

    /// Sets the maximum number of rows. Zero clears the bound.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// Applies a standalone clause part to the query.
    pub fn build<B: Build>(mut self, part: B) -> Self {
        trace!(part = std::any::type_name::<B>(), "applying clause part");
        part.build(&mut self);
        self
    }

    /// Fragment arguments in the order a translator emits placeholders:
    /// join fragments, then the WHERE tree, then the HAVING tree.
    pub fn fragment_args(&self) -> Vec<&Bson> {
        let mut args = Vec::new();

        for join in &self.joins {
            if let JoinClause::Fragment(fragment) = join {
                args.extend(fragment.args.iter());
            }
        }

        for tree in [&self.filter, &self.group.filter] {
            tree.walk(&mut |node| {
                if let Filter::Fragment(fragment) = node {
                    args.extend(fragment.args.iter());
                }
            });
        }

        args
    }
}
