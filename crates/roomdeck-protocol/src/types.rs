//! Core types exchanged with the matchmaking service.
//!
//! Everything here is plain data: room descriptions, room creation
//! options, the callbacks the service delivers, and the generation tag
//! that lets the client tell a fresh callback from a superseded one.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Custom property key carrying a room's region.
///
/// Rooms are created with this property set to the region the creator
/// picked, and the public room browser filters on it.
pub const REGION_PROPERTY: &str = "Region";

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// An attempt counter attached to every service request and callback.
///
/// The coordinator bumps its generation on every connect and disconnect.
/// A request carries the generation that was current when it was issued,
/// and the service echoes it back on the matching callback. Callbacks
/// whose generation is no longer current belong to a superseded attempt
/// and are dropped.
///
/// `#[serde(transparent)]` serializes `Generation(3)` as just `3`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Generation(pub u64);

impl Generation {
    /// Returns the generation that follows this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RoomRecord / RoomUpdate
// ---------------------------------------------------------------------------

/// One joinable session as described by the service's room list.
///
/// `name` is the key: two records with the same name describe the same
/// room at different points in time. `max_players == 0` is the service's
/// way of saying "this is not a real joinable room", so such records are
/// never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    /// Unique room name.
    pub name: String,
    /// Players currently in the room.
    pub player_count: u32,
    /// Player capacity. `0` is a sentinel for "not joinable".
    pub max_players: u32,
    /// Whether the room is listed publicly.
    pub visible: bool,
    /// Custom room properties. Expected to contain [`REGION_PROPERTY`].
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl RoomRecord {
    /// Creates a visible, empty room record with the given capacity.
    pub fn new(name: impl Into<String>, max_players: u32) -> Self {
        Self {
            name: name.into(),
            player_count: 0,
            max_players,
            visible: true,
            properties: BTreeMap::new(),
        }
    }

    /// Sets the [`REGION_PROPERTY`] custom property.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.properties
            .insert(REGION_PROPERTY.to_string(), region.into());
        self
    }

    /// Sets the current player count.
    #[must_use]
    pub fn with_player_count(mut self, player_count: u32) -> Self {
        self.player_count = player_count;
        self
    }

    /// Sets visibility.
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Returns the room's region, if the record carries one.
    pub fn region(&self) -> Option<&str> {
        self.properties.get(REGION_PROPERTY).map(String::as_str)
    }

    /// Returns `false` for the `max_players == 0` sentinel.
    pub fn has_capacity(&self) -> bool {
        self.max_players > 0
    }
}

/// One entry of a room-list batch: a record plus the transient
/// `removed` flag.
///
/// The flag only exists on the way in. The directory cache stores the
/// inner [`RoomRecord`], never the update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomUpdate {
    /// The room as the service currently sees it.
    pub record: RoomRecord,
    /// `true` when the service is dropping this room from the list.
    #[serde(default)]
    pub removed: bool,
}

impl RoomUpdate {
    /// An add-or-update entry for `record`.
    pub fn upsert(record: RoomRecord) -> Self {
        Self {
            record,
            removed: false,
        }
    }

    /// A removal entry. The service only sends the name for these, so
    /// the rest of the record is zeroed.
    pub fn removal(name: impl Into<String>) -> Self {
        Self {
            record: RoomRecord::new(name, 0).with_visible(false),
            removed: true,
        }
    }

    /// The room name this entry refers to.
    pub fn name(&self) -> &str {
        &self.record.name
    }
}

// ---------------------------------------------------------------------------
// RoomOptions
// ---------------------------------------------------------------------------

/// Options sent with a create-or-join request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomOptions {
    /// Player capacity of the room being created.
    pub max_players: u32,
    /// Whether the room shows up in the public room list.
    pub visible: bool,
    /// Custom properties; Roomdeck always sets [`REGION_PROPERTY`].
    #[serde(default)]
    pub custom_properties: BTreeMap<String, String>,
}

impl RoomOptions {
    /// Options for a room in `region`.
    pub fn new(max_players: u32, visible: bool, region: impl Into<String>) -> Self {
        let mut custom_properties = BTreeMap::new();
        custom_properties.insert(REGION_PROPERTY.to_string(), region.into());
        Self {
            max_players,
            visible,
            custom_properties,
        }
    }

    /// Returns the region custom property.
    pub fn region(&self) -> Option<&str> {
        self.custom_properties.get(REGION_PROPERTY).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Room presence
// ---------------------------------------------------------------------------

/// A member's number inside a room, assigned by the service on join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorNumber(pub u32);

impl fmt::Display for ActorNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A member of the room the client is in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub actor: ActorNumber,
    pub nickname: String,
}

impl Player {
    pub fn new(actor: u32, nickname: impl Into<String>) -> Self {
        Self {
            actor: ActorNumber(actor),
            nickname: nickname.into(),
        }
    }
}

/// What the service reports about a room when the client enters it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub name: String,
    pub max_players: u32,
    /// Everyone in the room, the local client included.
    pub players: Vec<Player>,
    /// Current master client.
    pub master: ActorNumber,
    /// The local client's own actor number.
    pub local: ActorNumber,
}

// ---------------------------------------------------------------------------
// ServiceEvent
// ---------------------------------------------------------------------------

/// A callback or notification delivered by the matchmaking service.
///
/// There is one variant per callback the service can make, so the
/// coordinator's handler is a single exhaustive `match`.
///
/// `#[serde(tag = "type")]` gives the internally tagged JSON form
/// `{ "type": "JoinFailed", "code": 32758, "message": "..." }`. Tags this
/// version doesn't know decode to [`ServiceEvent::Unrecognized`] instead
/// of failing, so a newer service can't wedge an older client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServiceEvent {
    // -- Connection lifecycle --

    /// The connect request succeeded; the client is on the master server.
    ConnectedToMaster,

    /// The connect request failed.
    ConnectFailed { cause: String },

    /// The service dropped the connection (or confirmed a disconnect).
    Disconnected { cause: String },

    /// The lobby join requested on entering the master server completed.
    JoinedLobby,

    // -- Room directory --

    /// An incremental batch of room-list changes, in service order.
    RoomListUpdate { rooms: Vec<RoomUpdate> },

    // -- Room membership --

    /// A create-or-join or join request succeeded.
    JoinedRoom { room: RoomSnapshot },

    /// A create-or-join or join request failed.
    JoinFailed { code: i16, message: String },

    /// The client left its room and is back on the master server.
    LeftRoom,

    /// Another player entered the client's room.
    PlayerEntered { player: Player },

    /// A player left the client's room.
    PlayerLeft { actor: ActorNumber },

    /// The master client role moved to another member.
    MasterClientSwitched { master: ActorNumber },

    // -- Errors --

    /// A service-level error not tied to a specific request.
    Error { code: i16, message: String },

    /// A callback this client version does not understand.
    #[serde(other)]
    Unrecognized,
}

impl ServiceEvent {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectedToMaster => "ConnectedToMaster",
            Self::ConnectFailed { .. } => "ConnectFailed",
            Self::Disconnected { .. } => "Disconnected",
            Self::JoinedLobby => "JoinedLobby",
            Self::RoomListUpdate { .. } => "RoomListUpdate",
            Self::JoinedRoom { .. } => "JoinedRoom",
            Self::JoinFailed { .. } => "JoinFailed",
            Self::LeftRoom => "LeftRoom",
            Self::PlayerEntered { .. } => "PlayerEntered",
            Self::PlayerLeft { .. } => "PlayerLeft",
            Self::MasterClientSwitched { .. } => "MasterClientSwitched",
            Self::Error { .. } => "Error",
            Self::Unrecognized => "Unrecognized",
        }
    }
}

/// A service callback tagged with the generation of the request (or
/// connection) it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inbound {
    pub generation: Generation,
    pub event: ServiceEvent,
}

impl Inbound {
    pub fn new(generation: Generation, event: ServiceEvent) -> Self {
        Self { generation, event }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_next_increments() {
        assert_eq!(Generation(0).next(), Generation(1));
        assert_eq!(Generation(41).next(), Generation(42));
    }

    #[test]
    fn test_generation_display() {
        assert_eq!(Generation(7).to_string(), "gen-7");
    }

    #[test]
    fn test_room_record_region_reads_custom_property() {
        let record = RoomRecord::new("A", 4).with_region("eu");
        assert_eq!(record.region(), Some("eu"));
        assert_eq!(RoomRecord::new("B", 4).region(), None);
    }

    #[test]
    fn test_room_record_zero_capacity_is_sentinel() {
        assert!(!RoomRecord::new("A", 0).has_capacity());
        assert!(RoomRecord::new("A", 1).has_capacity());
    }

    #[test]
    fn test_room_update_removal_is_flagged() {
        let update = RoomUpdate::removal("A");
        assert!(update.removed);
        assert_eq!(update.name(), "A");
        assert!(!RoomUpdate::upsert(RoomRecord::new("A", 4)).removed);
    }

    #[test]
    fn test_room_options_carry_region() {
        let options = RoomOptions::new(8, false, "us");
        assert_eq!(options.region(), Some("us"));
        assert_eq!(options.max_players, 8);
        assert!(!options.visible);
    }

    #[test]
    fn test_service_event_kind() {
        assert_eq!(ServiceEvent::JoinedLobby.kind(), "JoinedLobby");
        assert_eq!(
            ServiceEvent::RoomListUpdate { rooms: vec![] }.kind(),
            "RoomListUpdate"
        );
    }
}
