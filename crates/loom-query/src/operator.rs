use std::fmt;

use serde::{Deserialize, Serialize};

/// Comparison operator of a filter leaf.
///
/// Strings that don't name a known operator are kept verbatim in `Other`;
/// deciding whether the backend supports them is left to the translator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    IsNull,
    NotNull,
    In,
    NotIn,
    Like,
    NotLike,
    Other(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::IsNull => "is null",
            Operator::NotNull => "is not null",
            Operator::In => "in",
            Operator::NotIn => "not in",
            Operator::Like => "like",
            Operator::NotLike => "not like",
            Operator::Other(op) => op,
        }
    }
}

impl From<&str> for Operator {
    fn from(op: &str) -> Self {
        match op.trim().to_ascii_lowercase().as_str() {
            "=" | "==" => Operator::Eq,
            "!=" | "<>" => Operator::Ne,
            "<" => Operator::Lt,
            "<=" => Operator::Lte,
            ">" => Operator::Gt,
            ">=" => Operator::Gte,
            "is null" => Operator::IsNull,
            "is not null" => Operator::NotNull,
            "in" => Operator::In,
            "not in" => Operator::NotIn,
            "like" => Operator::Like,
            "not like" => Operator::NotLike,
            _ => Operator::Other(op.to_string()),
        }
    }
}

impl From<String> for Operator {
    fn from(op: String) -> Self {
        Operator::from(op.as_str())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
