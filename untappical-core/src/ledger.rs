//! Dedup ledger of check-ins already rendered into events.

use std::collections::HashSet;

/// Check-in ids that have been turned into calendar events.
///
/// Shared by every user: Untappd check-in ids are globally unique, so an id
/// seen in one user's feed is never rendered again for anyone. Entries are
/// never removed while the process runs.
#[derive(Debug, Default)]
pub struct Ledger {
    seen: HashSet<String>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn mark_seen(&mut self, id: &str) {
        self.seen.insert(id.to_string());
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
