//! Change notifications produced by the cache.

use roomdeck_protocol::RoomRecord;

/// A single mutation of the directory cache.
///
/// The cache returns these (instead of calling listeners itself) so the
/// layer above decides how to deliver them. Order matters: changes are
/// returned in the order they were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryChange {
    /// A new room entered the cache.
    Added(RoomRecord),
    /// A cached room's fields changed.
    Updated(RoomRecord),
    /// A room left the cache and its view was released.
    Removed(String),
}

impl DirectoryChange {
    /// The room name this change refers to.
    pub fn name(&self) -> &str {
        match self {
            Self::Added(record) | Self::Updated(record) => &record.name,
            Self::Removed(name) => name,
        }
    }
}

/// The outcome of reconciling one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Every mutation, in application order.
    pub changes: Vec<DirectoryChange>,
    /// Entries that changed nothing: zero-capacity records, removals for
    /// unknown names, and updates identical to what was cached.
    pub ignored: usize,
}

impl Reconciliation {
    pub fn added(&self) -> usize {
        self.count(|c| matches!(c, DirectoryChange::Added(_)))
    }

    pub fn updated(&self) -> usize {
        self.count(|c| matches!(c, DirectoryChange::Updated(_)))
    }

    pub fn removed(&self) -> usize {
        self.count(|c| matches!(c, DirectoryChange::Removed(_)))
    }

    /// `true` if the batch left the cache exactly as it was.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }

    fn count(&self, pred: impl Fn(&DirectoryChange) -> bool) -> usize {
        self.changes.iter().filter(|c| pred(c)).count()
    }
}
