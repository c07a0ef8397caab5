use bson::Bson;
use serde::{Deserialize, Serialize};

use crate::operator::Operator;

/// A single `field <operator> value` predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub field: String,
    pub operator: Operator,
    pub value: Bson,
}

/// A literal expression with positional arguments, passed through to the
/// translator untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub expr: String,
    pub args: Vec<Bson>,
}

impl Fragment {
    pub fn new(expr: impl Into<String>, args: impl IntoIterator<Item = Bson>) -> Self {
        Fragment {
            expr: expr.into(),
            args: args.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOp {
    And,
    Or,
}

/// A boolean predicate tree.
///
/// `Empty` is the identity: it reads as "always true" at the root of a
/// WHERE clause and disappears when combined with anything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    Empty,
    Compare(Comparison),
    Fragment(Fragment),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        matches!(self, Filter::Empty)
    }

    /// ANDs `filters` onto this tree.
    ///
    /// The receiver is the left operand. If either side is already an AND
    /// group its children are merged into the result instead of nesting it.
    pub fn and(self, filters: impl IntoIterator<Item = Filter>) -> Filter {
        combine(LogicalOp::And, std::iter::once(self).chain(filters))
    }

    /// ORs `filters` onto this tree, merging OR groups like [`Filter::and`].
    pub fn or(self, filters: impl IntoIterator<Item = Filter>) -> Filter {
        combine(LogicalOp::Or, std::iter::once(self).chain(filters))
    }

    /// Visits every node of the tree in pre-order, children left to right.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Filter)) {
        visit(self);
        match self {
            Filter::And(children) | Filter::Or(children) => {
                for child in children {
                    child.walk(visit);
                }
            }
            Filter::Not(inner) => inner.walk(visit),
            Filter::Empty | Filter::Compare(_) | Filter::Fragment(_) => {}
        }
    }

    fn group(op: LogicalOp, children: Vec<Filter>) -> Filter {
        match op {
            LogicalOp::And => Filter::And(children),
            LogicalOp::Or => Filter::Or(children),
        }
    }
}

fn combine(op: LogicalOp, filters: impl IntoIterator<Item = Filter>) -> Filter {
    let mut children = Vec::new();

    for filter in filters {
        match (op, filter) {
            (_, Filter::Empty) => {}
            (LogicalOp::And, Filter::And(inner)) | (LogicalOp::Or, Filter::Or(inner)) => {
                children.extend(inner.into_iter().filter(|child| !child.is_empty()))
            }
            (_, filter) => children.push(filter),
        }
    }

    if children.len() > 1 {
        return Filter::group(op, children);
    }
    children.pop().unwrap_or_default()
}

// ── Constructors ────────────────────────────────────────────────

/// Combines filters with AND. No filters yields [`Filter::Empty`], a single
/// filter is returned as is.
pub fn and(filters: impl IntoIterator<Item = Filter>) -> Filter {
    combine(LogicalOp::And, filters)
}

pub fn or(filters: impl IntoIterator<Item = Filter>) -> Filter {
    combine(LogicalOp::Or, filters)
}

/// Negates a filter. Negating [`Filter::Empty`] is still `Empty`, never
/// "always false".
pub fn not(filter: Filter) -> Filter {
    match filter {
        Filter::Empty => Filter::Empty,
        filter => Filter::Not(Box::new(filter)),
    }
}

pub fn compare(
    field: impl Into<String>,
    operator: impl Into<Operator>,
    value: impl Into<Bson>,
) -> Filter {
    Filter::Compare(Comparison {
        field: field.into(),
        operator: operator.into(),
        value: value.into(),
    })
}

pub fn fragment(expr: impl Into<String>, args: impl IntoIterator<Item = Bson>) -> Filter {
    Filter::Fragment(Fragment::new(expr, args))
}

pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Filter {
    compare(field, Operator::Eq, value)
}

pub fn ne(field: impl Into<String>, value: impl Into<Bson>) -> Filter {
    compare(field, Operator::Ne, value)
}

pub fn lt(field: impl Into<String>, value: impl Into<Bson>) -> Filter {
    compare(field, Operator::Lt, value)
}

pub fn lte(field: impl Into<String>, value: impl Into<Bson>) -> Filter {
    compare(field, Operator::Lte, value)
}

pub fn gt(field: impl Into<String>, value: impl Into<Bson>) -> Filter {
    compare(field, Operator::Gt, value)
}

pub fn gte(field: impl Into<String>, value: impl Into<Bson>) -> Filter {
    compare(field, Operator::Gte, value)
}

pub fn is_null(field: impl Into<String>) -> Filter {
    compare(field, Operator::IsNull, Bson::Null)
}

pub fn not_null(field: impl Into<String>) -> Filter {
    compare(field, Operator::NotNull, Bson::Null)
}

/// `field IN (values...)`; the operand is carried as a BSON array.
pub fn is_in<V: Into<Bson>>(
    field: impl Into<String>,
    values: impl IntoIterator<Item = V>,
) -> Filter {
    let values = values.into_iter().map(Into::into).collect::<Vec<Bson>>();
    compare(field, Operator::In, Bson::Array(values))
}

pub fn not_in<V: Into<Bson>>(
    field: impl Into<String>,
    values: impl IntoIterator<Item = V>,
) -> Filter {
    let values = values.into_iter().map(Into::into).collect::<Vec<Bson>>();
    compare(field, Operator::NotIn, Bson::Array(values))
}

pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Filter {
    compare(field, Operator::Like, pattern.into())
}

pub fn not_like(field: impl Into<String>, pattern: impl Into<String>) -> Filter {
    compare(field, Operator::NotLike, pattern.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_of_nothing_is_empty() {
        assert_eq!(and([]), Filter::Empty);
        assert_eq!(or([]), Filter::Empty);
    }

    #[test]
    fn single_filter_is_unwrapped() {
        assert_eq!(and([eq("a", 1)]), eq("a", 1));
        assert_eq!(or([eq("a", 1)]), eq("a", 1));
    }

    #[test]
    fn empty_operands_are_dropped() {
        assert_eq!(and([Filter::Empty, eq("a", 1)]), eq("a", 1));
        assert_eq!(
            or([eq("a", 1), Filter::Empty, eq("b", 2)]),
            Filter::Or(vec![eq("a", 1), eq("b", 2)])
        );
        assert_eq!(or([Filter::Empty, Filter::Empty]), Filter::Empty);
    }

    #[test]
    fn empty_is_identity_for_method_form() {
        let f = gt("age", 18);
        assert_eq!(Filter::Empty.and([f.clone()]), f);
        assert_eq!(f.clone().and([and([])]), f);
        assert_eq!(f.clone().or([Filter::Empty]), f);
    }

    #[test]
    fn chained_and_flattens() {
        let chained = eq("a", 1).and([eq("b", 2)]).and([eq("c", 3)]);
        assert_eq!(
            chained,
            Filter::And(vec![eq("a", 1), eq("b", 2), eq("c", 3)])
        );
        assert_eq!(chained, and([eq("a", 1), eq("b", 2), eq("c", 3)]));
    }

    #[test]
    fn chained_or_flattens() {
        let chained = or([eq("a", 1), eq("b", 2)]).or([eq("c", 3)]);
        assert_eq!(
            chained,
            Filter::Or(vec![eq("a", 1), eq("b", 2), eq("c", 3)])
        );
        assert_eq!(eq("a", 1).or([or([eq("b", 2), eq("c", 3)])]), chained);
    }

    // Groups built by hand through the public variants may hold empties.
    #[test]
    fn merged_group_children_drop_empties() {
        let hand_built = Filter::And(vec![Filter::Empty, eq("a", 1)]);
        assert_eq!(
            hand_built.and([eq("b", 2)]),
            Filter::And(vec![eq("a", 1), eq("b", 2)])
        );

        let hand_built = Filter::Or(vec![eq("a", 1), Filter::Empty]);
        assert_eq!(hand_built.or([Filter::Empty]), eq("a", 1));
    }

    #[test]
    fn and_inside_or_is_not_flattened() {
        let tree = and([eq("a", 1), eq("b", 2)]).or([eq("c", 3)]);
        assert_eq!(
            tree,
            Filter::Or(vec![
                Filter::And(vec![eq("a", 1), eq("b", 2)]),
                eq("c", 3),
            ])
        );
    }

    #[test]
    fn combining_leaves_operands_untouched() {
        let left = and([eq("a", 1), eq("b", 2)]);
        let snapshot = left.clone();
        let _combined = left.clone().and([eq("c", 3)]);
        assert_eq!(left, snapshot);
    }

    // Negating the identity stays the identity rather than becoming "always false".
    #[test]
    fn not_of_empty_is_empty() {
        assert_eq!(not(Filter::Empty), Filter::Empty);
        assert_eq!(not(eq("a", 1)), Filter::Not(Box::new(eq("a", 1))));
    }

    #[test]
    fn membership_operand_is_an_array() {
        let f = is_in("id", [1, 2, 3]);
        match f {
            Filter::Compare(c) => {
                assert_eq!(c.operator, Operator::In);
                assert_eq!(
                    c.value,
                    Bson::Array(vec![Bson::Int32(1), Bson::Int32(2), Bson::Int32(3)])
                );
            }
            _ => panic!("expected Compare, got {:?}", f),
        }
    }

    #[test]
    fn compare_accepts_opaque_operator() {
        let f = compare("tags", "@>", "rust");
        assert!(matches!(
            f,
            Filter::Compare(Comparison { operator: Operator::Other(ref op), .. }) if op == "@>"
        ));
    }

    #[test]
    fn walk_is_pre_order() {
        let tree = or([
            and([eq("a", 1), not(eq("b", 2))]),
            fragment("c > ?", [Bson::Int32(3)]),
        ]);
        let mut kinds = Vec::new();
        tree.walk(&mut |node| {
            kinds.push(match node {
                Filter::Empty => "empty",
                Filter::Compare(_) => "compare",
                Filter::Fragment(_) => "fragment",
                Filter::And(_) => "and",
                Filter::Or(_) => "or",
                Filter::Not(_) => "not",
            })
        });
        assert_eq!(kinds, ["or", "and", "compare", "not", "compare", "fragment"]);
    }
}
