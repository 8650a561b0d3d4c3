//! The seam to the external matchmaking service.
//!
//! Roomdeck doesn't implement the matchmaking transport: connecting,
//! authenticating, and shipping room lists around is the service SDK's
//! job. Instead it defines the [`MatchmakingService`] trait: the requests
//! the coordinator needs to make. Answers don't come back from these
//! calls; they arrive later as [`Inbound`](roomdeck_protocol::Inbound)
//! callbacks fed to [`Coordinator::handle`](crate::Coordinator::handle).

use roomdeck_protocol::{Generation, RoomOptions};

/// Requests the coordinator sends to the matchmaking service.
///
/// Every request that will be answered by a callback carries the
/// coordinator's current [`Generation`]. The implementation must tag the
/// matching callback with that same generation, so the coordinator can
/// drop answers to requests it has since abandoned.
///
/// All methods are fire-and-forget: they must not block waiting for the
/// service.
pub trait MatchmakingService {
    /// Connects to the master server of `region`.
    fn connect(&mut self, region: &str, generation: Generation);

    /// Drops the connection. No callback is expected.
    fn disconnect(&mut self);

    /// Joins the default lobby, which starts room-list updates.
    fn join_lobby(&mut self, generation: Generation);

    /// Creates `name` with `options`, or joins it if it exists.
    fn create_or_join_room(&mut self, name: &str, options: &RoomOptions, generation: Generation);

    /// Joins the existing room `name`.
    fn join_room(&mut self, name: &str, generation: Generation);

    /// Leaves the current room and returns to the master server.
    fn leave_room(&mut self, generation: Generation);

    /// Sets the nickname other players will see.
    fn set_nickname(&mut self, nickname: &str);
}

// ---------------------------------------------------------------------------
// RecordingService
// ---------------------------------------------------------------------------

/// One call made on a [`MatchmakingService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    Connect { region: String, generation: Generation },
    Disconnect,
    JoinLobby { generation: Generation },
    CreateOrJoinRoom {
        name: String,
        options: RoomOptions,
        generation: Generation,
    },
    JoinRoom { name: String, generation: Generation },
    LeaveRoom { generation: Generation },
    SetNickname(String),
}

/// A [`MatchmakingService`] that records every call and does nothing else.
///
/// Used by tests and demos that play the service's part by hand: inspect
/// [`calls`](Self::calls) to see what was requested, then feed the
/// callbacks you want to the coordinator.
#[derive(Debug, Clone, Default)]
pub struct RecordingService {
    calls: Vec<ServiceCall>,
}

impl RecordingService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, oldest first.
    pub fn calls(&self) -> &[ServiceCall] {
        &self.calls
    }

    /// The most recent call.
    pub fn last_call(&self) -> Option<&ServiceCall> {
        self.calls.last()
    }

    /// Removes and returns every recorded call.
    pub fn take_calls(&mut self) -> Vec<ServiceCall> {
        std::mem::take(&mut self.calls)
    }
}

impl MatchmakingService for RecordingService {
    fn connect(&mut self, region: &str, generation: Generation) {
        self.calls.push(ServiceCall::Connect {
            region: region.to_string(),
            generation,
        });
    }

    fn disconnect(&mut self) {
        self.calls.push(ServiceCall::Disconnect);
    }

    fn join_lobby(&mut self, generation: Generation) {
        self.calls.push(ServiceCall::JoinLobby { generation });
    }

    fn create_or_join_room(&mut self, name: &str, options: &RoomOptions, generation: Generation) {
        self.calls.push(ServiceCall::CreateOrJoinRoom {
            name: name.to_string(),
            options: options.clone(),
            generation,
        });
    }

    fn join_room(&mut self, name: &str, generation: Generation) {
        self.calls.push(ServiceCall::JoinRoom {
            name: name.to_string(),
            generation,
        });
    }

    fn leave_room(&mut self, generation: Generation) {
        self.calls.push(ServiceCall::LeaveRoom { generation });
    }

    fn set_nickname(&mut self, nickname: &str) {
        self.calls.push(ServiceCall::SetNickname(nickname.to_string()));
    }
}
