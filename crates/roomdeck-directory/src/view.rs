//! The UI seam: one view per cached room.
//!
//! A room browser usually shows each room as a widget (a list row, a
//! button, a card). The cache owns those widgets alongside the records so
//! that they are created, refreshed and destroyed in lockstep with the
//! data. The cache does not know what a widget is; it only talks to a
//! [`ViewFactory`].

use roomdeck_protocol::RoomRecord;

/// Creates, refreshes and releases the per-room UI resource.
///
/// # Ownership
///
/// `release` takes the view **by value**. Once the cache hands a view
/// back, it no longer has it, so a view can never be released twice and
/// never used after release.
///
/// # Example
///
/// ```rust
/// use roomdeck_directory::ViewFactory;
/// use roomdeck_protocol::RoomRecord;
///
/// /// Renders each room as a one-line label.
/// struct Labels;
///
/// impl ViewFactory for Labels {
///     type View = String;
///
///     fn create(&mut self, record: &RoomRecord) -> String {
///         format!("{} {}/{}", record.name, record.player_count, record.max_players)
///     }
///
///     fn update(&mut self, view: &mut String, record: &RoomRecord) {
///         *view = self.create(record);
///     }
///
///     fn release(&mut self, _view: String) {}
/// }
/// ```
pub trait ViewFactory {
    /// The UI resource owned by each cache entry.
    type View;

    /// Called once when a room enters the cache.
    fn create(&mut self, record: &RoomRecord) -> Self::View;

    /// Called when a cached room changes. The view is updated in place,
    /// so anything keyed on its identity stays valid.
    fn update(&mut self, view: &mut Self::View, record: &RoomRecord);

    /// Called exactly once when a room leaves the cache.
    fn release(&mut self, view: Self::View);
}

/// A [`ViewFactory`] for headless use: no UI, nothing to release.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoViews;

impl ViewFactory for NoViews {
    type View = ();

    fn create(&mut self, _record: &RoomRecord) -> Self::View {}

    fn update(&mut self, _view: &mut (), _record: &RoomRecord) {}

    fn release(&mut self, _view: ()) {}
}
