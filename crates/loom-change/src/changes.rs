use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::change::Change;

/// Ordered set of pending changes, at most one per field.
///
/// `fields` maps each field name to its position in `changes`; both are only
/// touched through [`Changes::set`] so they always agree. Re-setting a field
/// replaces the change at its original position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ChangesRepr", into = "ChangesRepr")]
pub struct Changes {
    fields: HashMap<String, usize>,
    changes: Vec<Change>,
    assoc: HashMap<String, usize>,
    assoc_changes: Vec<(String, Changes)>,
}

impl Changes {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field change is pending. Association changes are not
    /// counted.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn get(&self, field: &str) -> Option<&Change> {
        self.fields.get(field).map(|&index| &self.changes[index])
    }

    /// Records `change`, overwriting in place if its field already has one.
    pub fn set(&mut self, change: Change) {
        match self.fields.get(&change.field) {
            Some(&index) => {
                trace!(field = %change.field, index, "overwriting pending change");
                self.changes[index] = change;
            }
            None => {
                self.fields.insert(change.field.clone(), self.changes.len());
                self.changes.push(change);
            }
        }
    }

    /// Pending changes in first-set order.
    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    pub fn as_slice(&self) -> &[Change] {
        &self.changes
    }

    /// Attaches changes for a related collection, replacing any previous
    /// changes under the same name in place.
    pub fn set_assoc(&mut self, name: impl Into<String>, changes: Changes) {
        let name = name.into();
        match self.assoc.get(&name) {
            Some(&index) => {
                trace!(assoc = %name, index, "overwriting association changes");
                self.assoc_changes[index].1 = changes;
            }
            None => {
                self.assoc.insert(name.clone(), self.assoc_changes.len());
                self.assoc_changes.push((name, changes));
            }
        }
    }

    pub fn get_assoc(&self, name: &str) -> Option<&Changes> {
        self.assoc.get(name).map(|&index| &self.assoc_changes[index].1)
    }

    /// Changes for `name`, inserting an empty set if there are none yet.
    pub fn assoc_mut(&mut self, name: &str) -> &mut Changes {
        let index = match self.assoc.get(name) {
            Some(&index) => index,
            None => {
                self.assoc.insert(name.to_string(), self.assoc_changes.len());
                self.assoc_changes.push((name.to_string(), Changes::new()));
                self.assoc_changes.len() - 1
            }
        };
        &mut self.assoc_changes[index].1
    }

    /// Association changes in first-set order.
    pub fn assoc(&self) -> impl Iterator<Item = (&str, &Changes)> {
        self.assoc_changes
            .iter()
            .map(|(name, changes)| (name.as_str(), changes))
    }
}

impl<'a> IntoIterator for &'a Changes {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<Change> for Changes {
    fn extend<I: IntoIterator<Item = Change>>(&mut self, iter: I) {
        for change in iter {
            self.set(change);
        }
    }
}

impl FromIterator<Change> for Changes {
    fn from_iter<I: IntoIterator<Item = Change>>(iter: I) -> Self {
        let mut changes = Changes::new();
        changes.extend(iter);
        changes
    }
}

// ── Wire form ───────────────────────────────────────────────────

/// Serialized shape of [`Changes`]: the ordered entries only. The index maps
/// are rebuilt through [`Changes::set`] on the way back in.
#[derive(Serialize, Deserialize)]
struct ChangesRepr {
    changes: Vec<Change>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    assoc: Vec<(String, Changes)>,
}

impl From<ChangesRepr> for Changes {
    fn from(repr: ChangesRepr) -> Self {
        let mut changes: Changes = repr.changes.into_iter().collect();
        for (name, assoc) in repr.assoc {
            changes.set_assoc(name, assoc);
        }
        changes
    }
}

impl From<Changes> for ChangesRepr {
    fn from(changes: Changes) -> Self {
        ChangesRepr {
            changes: changes.changes,
            assoc: changes.assoc_changes,
        }
    }
}
