//! A [`MatchmakingService`] that forwards requests over a channel.
//!
//! The client's event loop owns its service. When the real service SDK
//! lives on another task (or another thread), [`ChannelService`] hands
//! every request to it as a [`ServiceCall`] and returns immediately.

use roomdeck_connection::{MatchmakingService, ServiceCall};
use roomdeck_protocol::{Generation, RoomOptions};
use tokio::sync::mpsc;

/// Sends each request as a [`ServiceCall`] on an unbounded channel.
///
/// If the receiving side is gone, requests are dropped with a warning:
/// the coordinator never waits on the service, so there is nobody to
/// return an error to.
#[derive(Debug, Clone)]
pub struct ChannelService {
    sender: mpsc::UnboundedSender<ServiceCall>,
}

impl ChannelService {
    /// Creates the service and the receiver the adapter reads requests from.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ServiceCall>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn send(&self, call: ServiceCall) {
        if self.sender.send(call).is_err() {
            tracing::warn!("service adapter is gone, dropping request");
        }
    }
}

impl MatchmakingService for ChannelService {
    fn connect(&mut self, region: &str, generation: Generation) {
        self.send(ServiceCall::Connect {
            region: region.to_string(),
            generation,
        });
    }

    fn disconnect(&mut self) {
        self.send(ServiceCall::Disconnect);
    }

    fn join_lobby(&mut self, generation: Generation) {
        self.send(ServiceCall::JoinLobby { generation });
    }

    fn create_or_join_room(&mut self, name: &str, options: &RoomOptions, generation: Generation) {
        self.send(ServiceCall::CreateOrJoinRoom {
            name: name.to_string(),
            options: options.clone(),
            generation,
        });
    }

    fn join_room(&mut self, name: &str, generation: Generation) {
        self.send(ServiceCall::JoinRoom {
            name: name.to_string(),
            generation,
        });
    }

    fn leave_room(&mut self, generation: Generation) {
        self.send(ServiceCall::LeaveRoom { generation });
    }

    fn set_nickname(&mut self, nickname: &str) {
        self.send(ServiceCall::SetNickname(nickname.to_string()));
    }
}
