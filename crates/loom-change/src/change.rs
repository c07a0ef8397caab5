use bson::Bson;
use serde::{Deserialize, Serialize};

use crate::changes::Changes;

/// A single field-level write operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOp {
    /// Assign a literal value.
    Set(Bson),
    /// Add to the current value.
    Inc(i64),
    /// Subtract from the current value.
    Dec(i64),
    /// Raw expression with positional arguments. The expression itself lives
    /// in [`Change::field`].
    Fragment(Vec<Bson>),
}

/// A single field + operator pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub field: String,
    pub op: ChangeOp,
}

impl Change {
    pub fn set(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Change {
            field: field.into(),
            op: ChangeOp::Set(value.into()),
        }
    }

    pub fn inc(field: impl Into<String>) -> Self {
        Change::inc_by(field, 1)
    }

    pub fn inc_by(field: impl Into<String>, n: i64) -> Self {
        Change {
            field: field.into(),
            op: ChangeOp::Inc(n),
        }
    }

    pub fn dec(field: impl Into<String>) -> Self {
        Change::dec_by(field, 1)
    }

    pub fn dec_by(field: impl Into<String>, n: i64) -> Self {
        Change {
            field: field.into(),
            op: ChangeOp::Dec(n),
        }
    }

    /// A raw assignment such as `"updated_at = now()"` or `"score = score * ?"`.
    pub fn fragment(raw: impl Into<String>, args: impl IntoIterator<Item = Bson>) -> Self {
        Change {
            field: raw.into(),
            op: ChangeOp::Fragment(args.into_iter().collect()),
        }
    }

    /// Records this change in `changes`, replacing any pending change for the
    /// same field.
    pub fn build(self, changes: &mut Changes) {
        changes.set(self);
    }
}
