//! The connection state machine's states.

use std::fmt;

/// Where the client is in its conversation with the matchmaking service.
///
/// ```text
/// Disconnected ──connect()──→ Connecting ──ConnectedToMaster──→ ConnectedToMaster
///                                                                 │ JoinedLobby
///                                                                 ▼
///          JoiningRoom ←──create / join── InLobby ←──JoinFailed── JoiningRoom
///               │ JoinedRoom
///               ▼
///            InRoom ──LeftRoom──→ ConnectedToMaster
///
/// any state ──disconnect() / Disconnected──→ Disconnected
/// ```
///
/// - **Disconnected**, **InLobby**, **InRoom** are *stable*: the client
///   waits there for the user.
/// - **Connecting**, **ConnectedToMaster**, **JoiningRoom** are
///   *intermediate*: the client waits there for a service callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    ConnectedToMaster,
    InLobby,
    JoiningRoom,
    InRoom,
}

impl ConnectionState {
    /// Returns `true` once a connection to the service has been
    /// established (anything past `Connecting`).
    pub fn is_connected(self) -> bool {
        !matches!(self, Self::Disconnected | Self::Connecting)
    }

    /// Returns `true` for states the client rests in while no request is
    /// outstanding.
    pub fn is_stable(self) -> bool {
        matches!(self, Self::Disconnected | Self::InLobby | Self::InRoom)
    }

    /// Returns `true` if room-list batches may be applied in this state.
    ///
    /// Batches that arrive while disconnected or still connecting are
    /// dropped: the reconnect hasn't completed, so they can't describe the
    /// directory this client is about to browse.
    pub fn accepts_room_list(self) -> bool {
        self.is_connected()
    }

    /// The state to fall back to when the service reports an error that
    /// isn't tied to a specific request.
    ///
    /// Intermediate states fall back to the nearest stable state before
    /// them; stable states stay put.
    pub fn stable_fallback(self) -> Self {
        match self {
            Self::Disconnected | Self::Connecting | Self::ConnectedToMaster => Self::Disconnected,
            Self::InLobby | Self::JoiningRoom => Self::InLobby,
            Self::InRoom => Self::InRoom,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting",
            Self::ConnectedToMaster => "ConnectedToMaster",
            Self::InLobby => "InLobby",
            Self::JoiningRoom => "JoiningRoom",
            Self::InRoom => "InRoom",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ConnectionState; 6] = [
        ConnectionState::Disconnected,
        ConnectionState::Connecting,
        ConnectionState::ConnectedToMaster,
        ConnectionState::InLobby,
        ConnectionState::JoiningRoom,
        ConnectionState::InRoom,
    ];

    #[test]
    fn test_state_is_connected() {
        assert!(!ConnectionState::Disconnected.is_connected());
        assert!(!ConnectionState::Connecting.is_connected());
        assert!(ConnectionState::ConnectedToMaster.is_connected());
        assert!(ConnectionState::InLobby.is_connected());
        assert!(ConnectionState::JoiningRoom.is_connected());
        assert!(ConnectionState::InRoom.is_connected());
    }

    #[test]
    fn test_state_stable_fallback_is_always_stable() {
        for state in ALL {
            assert!(state.stable_fallback().is_stable(), "{state} falls back to unstable state");
        }
    }

    #[test]
    fn test_state_stable_fallback_targets() {
        assert_eq!(
            ConnectionState::Connecting.stable_fallback(),
            ConnectionState::Disconnected
        );
        assert_eq!(
            ConnectionState::JoiningRoom.stable_fallback(),
            ConnectionState::InLobby
        );
        assert_eq!(ConnectionState::InRoom.stable_fallback(), ConnectionState::InRoom);
    }

    #[test]
    fn test_state_room_list_rejected_before_connect_completes() {
        assert!(!ConnectionState::Disconnected.accepts_room_list());
        assert!(!ConnectionState::Connecting.accepts_room_list());
        assert!(ConnectionState::InLobby.accepts_room_list());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ConnectionState::ConnectedToMaster.to_string(), "ConnectedToMaster");
        assert_eq!(ConnectionState::InRoom.to_string(), "InRoom");
    }
}
