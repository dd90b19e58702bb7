use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Added/removed symbol sets produced when universe membership changes.
///
/// Both lists are sorted ascending so delivery order is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl SecurityChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Diff previous membership against a new selection.
pub fn diff_membership(prev: &BTreeSet<String>, next: &[String]) -> SecurityChanges {
    let next_set: BTreeSet<&String> = next.iter().collect();
    let added = next
        .iter()
        .filter(|s| !prev.contains(*s))
        .cloned()
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect();
    let removed = prev
        .iter()
        .filter(|s| !next_set.contains(*s))
        .cloned()
        .collect();
    SecurityChanges { added, removed }
}
