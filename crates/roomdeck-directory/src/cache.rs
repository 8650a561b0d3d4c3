//! The directory cache: the client's copy of the service's room list.
//!
//! # Invariants
//!
//! These hold after every single record is processed, not only at the end
//! of a batch:
//!
//! 1. No cached record has `max_players == 0`.
//! 2. Every cached record's `name` equals its map key.
//! 3. A record the service marked removed is no longer cached.
//! 4. Every cached record owns exactly one live view; a view is released
//!    exactly once, when its record leaves the cache.
//! 5. While a region filter is active, every cached record's region equals
//!    the filter.

use std::collections::HashMap;

use roomdeck_protocol::{RoomRecord, RoomUpdate};

use crate::{DirectoryChange, Reconciliation, ViewFactory};

/// A cached room: its latest record and the view created for it.
struct Entry<V> {
    record: RoomRecord,
    view: V,
}

/// Maps room names to their latest [`RoomRecord`] and UI view.
///
/// The cache is only ever mutated through [`apply_batch`](Self::apply_batch),
/// [`retain_region`](Self::retain_region) and [`clear`](Self::clear). Nothing
/// else gets a `&mut` to a record, so the invariants above can't be broken
/// from outside.
///
/// Like the rest of the core, the cache is not thread-safe by itself. It
/// is owned by the connection coordinator, which runs on a single task.
pub struct DirectoryCache<F: ViewFactory> {
    /// Cached rooms, keyed by room name.
    entries: HashMap<String, Entry<F::View>>,

    /// Builds and tears down the per-room views.
    factory: F,

    /// When set, only rooms in this region may be cached.
    region_filter: Option<String>,
}

impl<F: ViewFactory> DirectoryCache<F> {
    /// Creates an empty cache that builds views with `factory`.
    pub fn new(factory: F) -> Self {
        Self {
            entries: HashMap::new(),
            factory,
            region_filter: None,
        }
    }

    // -----------------------------------------------------------------
    // Reconciliation
    // -----------------------------------------------------------------

    /// Merges one room-list batch into the cache, record by record, in
    /// batch order.
    ///
    /// For each update:
    /// 1. removed → drop the cached entry (if any) and release its view
    /// 2. `max_players == 0` → ignore
    /// 3. outside the active region filter → treated like a removal
    /// 4. already cached → update the record and its view in place
    /// 5. otherwise → insert and create a view
    ///
    /// Applying the same batch twice is a no-op the second time.
    pub fn apply_batch(&mut self, batch: &[RoomUpdate]) -> Reconciliation {
        let mut outcome = Reconciliation::default();
        for update in batch {
            match self.apply(update) {
                Some(change) => outcome.changes.push(change),
                None => outcome.ignored += 1,
            }
        }
        outcome
    }

    /// Applies a single update. Returns the resulting change, or `None`
    /// if the cache was left untouched.
    pub fn apply(&mut self, update: &RoomUpdate) -> Option<DirectoryChange> {
        let record = &update.record;

        if update.removed {
            return self.remove(&record.name);
        }

        if !record.has_capacity() {
            tracing::debug!(room = %record.name, "ignoring zero-capacity room");
            return None;
        }

        if !self.in_filter(record) {
            tracing::debug!(
                room = %record.name,
                region = record.region().unwrap_or("<none>"),
                "room outside region filter"
            );
            return self.remove(&record.name);
        }

        // `get_mut` borrows only `self.entries`, so `self.factory` is
        // still free to borrow mutably alongside it.
        if let Some(entry) = self.entries.get_mut(&record.name) {
            if entry.record == *record {
                return None;
            }
            entry.record.player_count = record.player_count;
            entry.record.max_players = record.max_players;
            entry.record.visible = record.visible;
            entry.record.properties.clone_from(&record.properties);
            self.factory.update(&mut entry.view, &entry.record);
            tracing::debug!(
                room = %record.name,
                players = record.player_count,
                max = record.max_players,
                "room updated"
            );
            return Some(DirectoryChange::Updated(entry.record.clone()));
        }

        let view = self.factory.create(record);
        self.entries.insert(
            record.name.clone(),
            Entry {
                record: record.clone(),
                view,
            },
        );
        tracing::debug!(room = %record.name, "room added");
        Some(DirectoryChange::Added(record.clone()))
    }

    /// Removes `name` and releases its view. Removing an unknown name is
    /// a no-op: the service may retract rooms we never saw.
    fn remove(&mut self, name: &str) -> Option<DirectoryChange> {
        match self.entries.remove(name) {
            Some(entry) => {
                self.factory.release(entry.view);
                tracing::debug!(room = %name, "room removed");
                Some(DirectoryChange::Removed(name.to_string()))
            }
            None => {
                tracing::debug!(room = %name, "removal for unknown room, ignoring");
                None
            }
        }
    }

    fn in_filter(&self, record: &RoomRecord) -> bool {
        match &self.region_filter {
            Some(region) => record.region() == Some(region.as_str()),
            None => true,
        }
    }

    // -----------------------------------------------------------------
    // Region refresh and clear
    // -----------------------------------------------------------------

    /// Keeps only rooms whose region is `region`, and keeps filtering
    /// later batches to that region until [`clear`](Self::clear).
    ///
    /// Every dropped room is handled exactly like a removal update: its
    /// view is released and a [`DirectoryChange::Removed`] is returned.
    /// Removals are returned in name order.
    pub fn retain_region(&mut self, region: &str) -> Vec<DirectoryChange> {
        self.region_filter = Some(region.to_string());

        let mut stale: Vec<String> = self
            .entries
            .values()
            .filter(|entry| entry.record.region() != Some(region))
            .map(|entry| entry.record.name.clone())
            .collect();
        stale.sort();

        let changes: Vec<DirectoryChange> =
            stale.iter().filter_map(|name| self.remove(name)).collect();
        tracing::debug!(%region, removed = changes.len(), "directory pruned to region");
        changes
    }

    /// Releases every view and empties the cache. Also drops the region
    /// filter. Removals are returned in name order.
    pub fn clear(&mut self) -> Vec<DirectoryChange> {
        self.region_filter = None;

        let mut drained: Vec<(String, Entry<F::View>)> = self.entries.drain().collect();
        drained.sort_by(|a, b| a.0.cmp(&b.0));

        let mut changes = Vec::with_capacity(drained.len());
        for (name, entry) in drained {
            self.factory.release(entry.view);
            changes.push(DirectoryChange::Removed(name));
        }
        if !changes.is_empty() {
            tracing::debug!(removed = changes.len(), "directory cleared");
        }
        changes
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// Looks up a cached room by name.
    pub fn get(&self, name: &str) -> Option<&RoomRecord> {
        self.entries.get(name).map(|entry| &entry.record)
    }

    /// Looks up the view owned by a cached room.
    pub fn view(&self, name: &str) -> Option<&F::View> {
        self.entries.get(name).map(|entry| &entry.view)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Cached rooms sorted by name.
    pub fn rooms(&self) -> Vec<&RoomRecord> {
        let mut rooms: Vec<&RoomRecord> =
            self.entries.values().map(|entry| &entry.record).collect();
        rooms.sort_by(|a, b| a.name.cmp(&b.name));
        rooms
    }

    /// Iterates `(key, record)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoomRecord)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), &entry.record))
    }

    /// The active region filter, if any.
    pub fn region_filter(&self) -> Option<&str> {
        self.region_filter.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The view factory, e.g. to inspect a UI's bookkeeping.
    pub fn factory(&self) -> &F {
        &self.factory
    }
}

// =========================================================================
// Tests
// =========================================================================
