//! What goes in (intents) and what comes out (events) of the coordinator.

use roomdeck_protocol::{ActorNumber, RoomOptions, RoomRecord};

use crate::{ConnectionError, ConnectionState, RoomPresence};

/// A room request the user made.
///
/// Intents are validated by the caller, then either issued right away
/// (in the lobby) or queued until the lobby is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Create the room, or join it if it already exists.
    CreateRoom { name: String, options: RoomOptions },
    /// Join an existing room by name.
    JoinRoom { name: String },
}

impl Intent {
    /// The room this intent targets.
    pub fn room_name(&self) -> &str {
        match self {
            Self::CreateRoom { name, .. } | Self::JoinRoom { name } => name,
        }
    }
}

/// A notification for the UI / scene layer.
///
/// The coordinator queues these while it handles a call; the host drains
/// them afterwards with [`Coordinator::drain_events`](crate::Coordinator::drain_events).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    // -- Directory --

    RoomAdded(RoomRecord),
    RoomUpdated(RoomRecord),
    RoomRemoved(String),

    // -- Connection --

    StateChanged {
        from: ConnectionState,
        to: ConnectionState,
    },

    /// The client entered a room; the host should load `scene`.
    EnterRoom { room: String, scene: String },

    /// A default nickname was generated because the user never set one.
    NicknameAssigned(String),

    // -- Presence --

    /// The player list of the current room changed.
    PresenceChanged(RoomPresence),

    /// The master client changed. `is_local` tells the UI whether to show
    /// master-only controls (e.g. "start the game").
    MasterClientChanged { master: ActorNumber, is_local: bool },

    // -- Failures --

    ConnectFailed { cause: String },
    JoinFailed { code: i16, message: String },

    /// A service error not tied to a request.
    ServiceError { code: i16, message: String },

    /// A queued intent was dropped because the connection never reached
    /// the lobby.
    IntentFailed {
        intent: Intent,
        error: ConnectionError,
    },
}

impl ClientEvent {
    /// The user-facing error this event reports, if it reports one.
    pub fn error(&self) -> Option<ConnectionError> {
        match self {
            Self::ConnectFailed { cause } => Some(ConnectionError::ConnectFailed(cause.clone())),
            Self::JoinFailed { code, message } => Some(ConnectionError::JoinFailed {
                code: *code,
                message: message.clone(),
            }),
            Self::ServiceError { code, message } => Some(ConnectionError::Service {
                code: *code,
                message: message.clone(),
            }),
            Self::IntentFailed { error, .. } => Some(error.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_room_name() {
        let create = Intent::CreateRoom {
            name: "A".into(),
            options: RoomOptions::new(4, true, "eu"),
        };
        assert_eq!(create.room_name(), "A");
        assert_eq!(Intent::JoinRoom { name: "B".into() }.room_name(), "B");
    }

    #[test]
    fn test_event_error_maps_failures() {
        let failed = ClientEvent::JoinFailed {
            code: 32758,
            message: "Game does not exist".into(),
        };
        assert!(matches!(
            failed.error(),
            Some(ConnectionError::JoinFailed { code: 32758, .. })
        ));
        assert_eq!(ClientEvent::RoomRemoved("A".into()).error(), None);
    }

    #[test]
    fn test_event_error_service_error_is_reported() {
        let event = ClientEvent::ServiceError {
            code: -1,
            message: "boom".into(),
        };

        assert_eq!(
            event.error(),
            Some(ConnectionError::Service {
                code: -1,
                message: "boom".into(),
            })
        );
    }
}
