//! User actions: the buttons of a lobby browser.
//!
//! [`SessionActions`] is what a UI calls. It validates input, turns it into
//! coordinator requests, and owns the [`RegionSelector`] so that picking a
//! region and refreshing the list go through one place.

use roomdeck_connection::{
    ActionError, ClientEvent, ConnectionState, Coordinator, CoordinatorConfig, Intent,
    MatchmakingService, ValidationError,
};
use roomdeck_directory::ViewFactory;
use roomdeck_protocol::{Inbound, RoomOptions};

use crate::RegionSelector;

/// Validates and forwards user actions to a [`Coordinator`].
///
/// Like the coordinator it wraps, this is synchronous and meant to be
/// owned by a single task. [`spawn_client`](crate::spawn_client) runs one
/// behind a channel.
pub struct SessionActions<S: MatchmakingService, F: ViewFactory> {
    coordinator: Coordinator<S, F>,
    regions: RegionSelector,
}

impl<S: MatchmakingService, F: ViewFactory> SessionActions<S, F> {
    pub fn new(service: S, factory: F, config: CoordinatorConfig) -> Self {
        let regions = RegionSelector::new(config.default_region.clone());
        Self {
            coordinator: Coordinator::new(service, factory, config),
            regions,
        }
    }

    /// Creates `name`, or joins it if it already exists.
    ///
    /// The room is tagged with `region` so other clients can filter on it.
    /// If the client isn't in the lobby yet, the request waits for it.
    ///
    /// # Errors
    /// - [`ValidationError::EmptyName`] if `name` is empty. Nothing is sent.
    /// - [`ConnectionError::Busy`](roomdeck_connection::ConnectionError::Busy)
    ///   if another request is outstanding.
    pub fn create_room(
        &mut self,
        name: &str,
        max_players: u32,
        visible: bool,
        region: &str,
    ) -> Result<(), ActionError> {
        let name = require_name(name)?;
        self.coordinator.submit(Intent::CreateRoom {
            name,
            options: RoomOptions::new(max_players, visible, region),
        })?;
        Ok(())
    }

    /// Joins an existing room by name.
    ///
    /// # Errors
    /// Same as [`create_room`](Self::create_room).
    pub fn join_room_by_name(&mut self, name: &str) -> Result<(), ActionError> {
        let name = require_name(name)?;
        self.coordinator.submit(Intent::JoinRoom { name })?;
        Ok(())
    }

    /// Joins the selected room.
    ///
    /// Returns `Ok(false)` without doing anything if no room is selected,
    /// or the selected room has since left the directory.
    pub fn join_selected(&mut self) -> Result<bool, ActionError> {
        let Some(name) = self.coordinator.selected_room().map(|r| r.name.clone()) else {
            tracing::debug!("join selected: nothing selected");
            return Ok(false);
        };
        self.coordinator.submit(Intent::JoinRoom { name })?;
        Ok(true)
    }

    /// Highlights a room in the directory.
    pub fn select_room(&mut self, name: &str) -> bool {
        self.coordinator.select_room(name)
    }

    /// Refreshes the room list for `region`.
    ///
    /// A new region means a new master server: the client reconnects and
    /// starts from an empty directory. The same region only prunes rooms
    /// that don't belong to it.
    pub fn refresh(&mut self, region: &str) {
        if self.regions.select(region) {
            self.coordinator.region_changed(region);
        } else {
            self.coordinator.prune_to_region(region);
        }
    }

    /// The user left the room browser: drop the directory and its views.
    pub fn leave_browsing(&mut self) {
        self.coordinator.clear_directory();
    }

    pub fn set_nickname(&mut self, nickname: &str) {
        self.coordinator.set_nickname(nickname);
    }

    pub fn leave_room(&mut self) -> Result<(), ActionError> {
        self.coordinator.leave_room()?;
        Ok(())
    }

    /// Connects to the selected region. `false` if already connecting or
    /// connected.
    pub fn connect(&mut self) -> bool {
        self.coordinator.connect()
    }

    pub fn disconnect(&mut self) {
        self.coordinator.disconnect();
    }

    /// Applies a service callback.
    pub fn handle(&mut self, inbound: Inbound) {
        self.coordinator.handle(inbound);
    }

    pub fn drain_events(&mut self) -> Vec<ClientEvent> {
        self.coordinator.drain_events()
    }

    pub fn state(&self) -> ConnectionState {
        self.coordinator.state()
    }

    pub fn region(&self) -> &str {
        self.regions.current()
    }

    pub fn coordinator(&self) -> &Coordinator<S, F> {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut Coordinator<S, F> {
        &mut self.coordinator
    }
}

fn require_name(name: &str) -> Result<String, ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}
