//! Set of card ids with an add-to-collection request in flight.
//!
//! `begin` refuses an id that is already pending, which is how a second click
//! on the same card is ignored. `finish` is idempotent: releasing an id that
//! is not pending is a no-op, so a late or duplicated reply can never leave a
//! card stuck.

use crate::domain::CardId;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingAdds {
    ids: BTreeSet<CardId>,
}

impl PendingAdds {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }

    /// Marks `id` as pending. Returns `false` if it already was.
    pub fn begin(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            tracing::debug!(card_id = %id, "add already in flight");
            return false;
        }
        self.ids.insert(id.to_string());
        true
    }

    /// Releases `id`. Returns whether it was pending.
    pub fn finish(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}
