//! Collection resolver: the user's collections and the default target.
//!
//! The resolver is fed session transitions. Going from "no session" to "has
//! session" asks for exactly one collections fetch; going back clears the
//! cache at once. When the list arrives the first entry becomes the default
//! collection, with no other selection rule.

use crate::domain::{CollectionId, CollectionRef};

/// Where the resolver is in its fetch cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolverStatus {
    /// No session, nothing cached.
    #[default]
    Idle,
    /// A collections request is in flight.
    Fetching,
    /// The list arrived (possibly empty).
    Ready,
    /// The request failed; the default stays absent.
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionResolver {
    collections: Vec<CollectionRef>,
    default_id: Option<CollectionId>,
    status: ResolverStatus,
}

impl CollectionResolver {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            collections: Vec::new(),
            default_id: None,
            status: ResolverStatus::Idle,
        }
    }

    /// Reacts to a session change.
    ///
    /// Returns `true` when the caller must issue a collections request, which
    /// happens only on the anonymous → authenticated edge.
    pub fn on_session_change(&mut self, was_authenticated: bool, is_authenticated: bool) -> bool {
        match (was_authenticated, is_authenticated) {
            (false, true) => {
                self.collections.clear();
                self.default_id = None;
                self.status = ResolverStatus::Fetching;
                true
            }
            (true, false) => {
                self.clear();
                false
            }
            _ => false,
        }
    }

    /// Stores a fetched list and picks its first element as default.
    pub fn on_loaded(&mut self, collections: Vec<CollectionRef>) {
        self.default_id = collections.first().map(|collection| collection.id);
        self.collections = collections;
        self.status = ResolverStatus::Ready;

        tracing::debug!(
            collection_count = self.collections.len(),
            default_id = ?self.default_id,
            "collections resolved"
        );
    }

    pub fn on_failed(&mut self) {
        self.collections.clear();
        self.default_id = None;
        self.status = ResolverStatus::Failed;
    }

    /// Marks a manual refetch; the current default stays usable meanwhile.
    pub fn on_refetch(&mut self) {
        self.status = ResolverStatus::Fetching;
    }

    pub fn clear(&mut self) {
        self.collections.clear();
        self.default_id = None;
        self.status = ResolverStatus::Idle;
    }

    #[must_use]
    pub fn collections(&self) -> &[CollectionRef] {
        &self.collections
    }

    #[must_use]
    pub const fn default_id(&self) -> Option<CollectionId> {
        self.default_id
    }

    #[must_use]
    pub fn default_collection(&self) -> Option<&CollectionRef> {
        let id = self.default_id?;
        self.collections.iter().find(|collection| collection.id == id)
    }

    #[must_use]
    pub const fn status(&self) -> ResolverStatus {
        self.status
    }
}
