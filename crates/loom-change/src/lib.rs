//! Pending write payloads.
//!
//! A [`Changes`] value records at most one [`Change`] per field, in the
//! order fields were first touched. Setting a field again replaces its
//! pending change in place.

mod change;
mod changes;

pub use bson::Bson;
pub use change::{Change, ChangeOp};
pub use changes::Changes;
