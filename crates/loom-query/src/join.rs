use bson::Bson;
use serde::{Deserialize, Serialize};

use crate::filter::Fragment;

pub const DEFAULT_JOIN_MODE: &str = "JOIN";

/// Fields correlating the joined collection with the rest of the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correlation {
    pub from: String,
    pub to: String,
}

/// One join specification. The mode is whatever the caller passed
/// (`"JOIN"`, `"LEFT JOIN"`, ...) and is not checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinClause {
    Structured {
        mode: String,
        collection: String,
        on: Option<Correlation>,
    },
    Fragment(Fragment),
}

impl JoinClause {
    pub fn new(collection: impl Into<String>) -> Self {
        JoinClause::Structured {
            mode: DEFAULT_JOIN_MODE.to_string(),
            collection: collection.into(),
            on: None,
        }
    }

    pub fn with(
        mode: impl Into<String>,
        collection: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        JoinClause::Structured {
            mode: mode.into(),
            collection: collection.into(),
            on: Some(Correlation {
                from: from.into(),
                to: to.into(),
            }),
        }
    }

    pub fn fragment(expr: impl Into<String>, args: impl IntoIterator<Item = Bson>) -> Self {
        JoinClause::Fragment(Fragment::new(expr, args))
    }
}
