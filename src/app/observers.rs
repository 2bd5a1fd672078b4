//! Observer set: the subscribers of one resource.
//!
//! Membership only: no ordering, no duplicates. Capacity is fixed so a
//! resource never allocates on the request path; a full set reports
//! [`Error::Capacity`].

use heapless::FnvIndexSet;

use crate::error::{Error, Result};

/// Maximum observers per resource (must be a power of two).
pub const OBSERVER_CAPACITY: usize = 16;

/// Opaque subscriber id handed out by the platform.
pub type ObserverId = i32;

#[derive(Debug, Clone, Default)]
pub struct ObserverSet {
    ids: FnvIndexSet<ObserverId, OBSERVER_CAPACITY>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self {
            ids: FnvIndexSet::new(),
        }
    }

    /// Add `id`. Re-registering an existing id is a no-op.
    pub fn add(&mut self, id: ObserverId) -> Result<()> {
        self.ids
            .insert(id)
            .map(|_| ())
            .map_err(|_| Error::Capacity("observer set"))
    }

    /// Remove `id`. Returns whether it was a member.
    pub fn remove(&mut self, id: ObserverId) -> bool {
        self.ids.remove(&id)
    }

    pub fn contains(&self, id: ObserverId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `add(id)` would succeed.
    pub fn can_add(&self, id: ObserverId) -> bool {
        self.ids.contains(&id) || self.ids.len() < OBSERVER_CAPACITY
    }

    pub fn iter(&self) -> impl Iterator<Item = ObserverId> + '_ {
        self.ids.iter().copied()
    }
}
