//! The client event loop: a Tokio task that owns a [`SessionActions`].
//!
//! User actions and service callbacks both go through the same bounded
//! `mpsc` queue, so the loop sees them in exactly the order they were
//! sent. Each is handled to completion before the next is read, and the
//! resulting [`ClientEvent`]s are forwarded on an unbounded channel.
//!
//! ```text
//! ClientHandle ──Command──┐
//!                          ├─→ [ mpsc queue ] ─→ ClientActor ─→ ClientEvent stream
//! ServiceSender ─Inbound──┘                        │
//!                                                  └─→ MatchmakingService
//! ```

use roomdeck_connection::{
    ActionError, ClientEvent, ConnectionState, MatchmakingService, RoomPresence,
};
use roomdeck_directory::ViewFactory;
use roomdeck_protocol::{Codec, Generation, Inbound, RoomRecord};
use tokio::sync::{mpsc, oneshot};

use crate::{ClientConfig, RoomdeckError, SessionActions};

/// Commands sent to the client actor through its queue.
enum Command {
    CreateRoom {
        name: String,
        max_players: u32,
        visible: bool,
        region: String,
        reply: oneshot::Sender<Result<(), ActionError>>,
    },
    JoinRoom {
        name: String,
        reply: oneshot::Sender<Result<(), ActionError>>,
    },
    JoinSelected {
        reply: oneshot::Sender<Result<bool, ActionError>>,
    },
    SelectRoom {
        name: String,
        reply: oneshot::Sender<bool>,
    },
    Refresh {
        region: String,
    },
    LeaveBrowsing,
    SetNickname {
        nickname: String,
    },
    LeaveRoom {
        reply: oneshot::Sender<Result<(), ActionError>>,
    },
    Connect {
        reply: oneshot::Sender<bool>,
    },
    Disconnect,
    Snapshot {
        reply: oneshot::Sender<ClientSnapshot>,
    },

    /// A callback from the matchmaking service.
    Service(Inbound),

    Shutdown,
}

/// A point-in-time copy of the client's state, for UIs and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSnapshot {
    pub state: ConnectionState,
    pub generation: Generation,
    pub region: String,
    /// Cached rooms sorted by name.
    pub rooms: Vec<RoomRecord>,
    pub selected: Option<String>,
    pub presence: Option<RoomPresence>,
    pub nickname: Option<String>,
}

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Handle for the UI side. Cheap to clone.
#[derive(Clone)]
pub struct ClientHandle {
    sender: mpsc::Sender<Command>,
}

impl ClientHandle {
    /// See [`SessionActions::create_room`].
    pub async fn create_room(
        &self,
        name: &str,
        max_players: u32,
        visible: bool,
        region: &str,
    ) -> Result<(), RoomdeckError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::CreateRoom {
            name: name.to_string(),
            max_players,
            visible,
            region: region.to_string(),
            reply,
        })
        .await?;
        Ok(recv(rx).await??)
    }

    /// See [`SessionActions::join_room_by_name`].
    pub async fn join_room_by_name(&self, name: &str) -> Result<(), RoomdeckError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::JoinRoom {
            name: name.to_string(),
            reply,
        })
        .await?;
        Ok(recv(rx).await??)
    }

    /// See [`SessionActions::join_selected`].
    pub async fn join_selected(&self) -> Result<bool, RoomdeckError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::JoinSelected { reply }).await?;
        Ok(recv(rx).await??)
    }

    pub async fn select_room(&self, name: &str) -> Result<bool, RoomdeckError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::SelectRoom {
            name: name.to_string(),
            reply,
        })
        .await?;
        recv(rx).await
    }

    /// See [`SessionActions::refresh`].
    pub async fn refresh(&self, region: &str) -> Result<(), RoomdeckError> {
        self.send(Command::Refresh {
            region: region.to_string(),
        })
        .await
    }

    pub async fn leave_browsing(&self) -> Result<(), RoomdeckError> {
        self.send(Command::LeaveBrowsing).await
    }

    pub async fn set_nickname(&self, nickname: &str) -> Result<(), RoomdeckError> {
        self.send(Command::SetNickname {
            nickname: nickname.to_string(),
        })
        .await
    }

    pub async fn leave_room(&self) -> Result<(), RoomdeckError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::LeaveRoom { reply }).await?;
        Ok(recv(rx).await??)
    }

    /// Returns `false` if the client was already connecting or connected.
    pub async fn connect(&self) -> Result<bool, RoomdeckError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Connect { reply }).await?;
        recv(rx).await
    }

    pub async fn disconnect(&self) -> Result<(), RoomdeckError> {
        self.send(Command::Disconnect).await
    }

    /// Everything queued before this call has been handled by the time
    /// the snapshot is taken.
    pub async fn snapshot(&self) -> Result<ClientSnapshot, RoomdeckError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        recv(rx).await
    }

    /// Stops the event loop. Pending commands queued before this one are
    /// still handled.
    pub async fn shutdown(&self) -> Result<(), RoomdeckError> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> Result<(), RoomdeckError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| RoomdeckError::ClientClosed)
    }
}

/// Handle for the service adapter: feeds callbacks into the client's
/// queue behind any user actions already queued.
#[derive(Clone)]
pub struct ServiceSender {
    sender: mpsc::Sender<Command>,
}

impl ServiceSender {
    pub async fn deliver(&self, inbound: Inbound) -> Result<(), RoomdeckError> {
        self.sender
            .send(Command::Service(inbound))
            .await
            .map_err(|_| RoomdeckError::ClientClosed)
    }

    /// Decodes a callback with `codec` and delivers it.
    ///
    /// # Errors
    /// [`RoomdeckError::Protocol`] if the bytes don't decode. Nothing is
    /// delivered in that case.
    pub async fn deliver_encoded<C: Codec>(
        &self,
        codec: &C,
        bytes: &[u8],
    ) -> Result<(), RoomdeckError> {
        let inbound: Inbound = codec.decode(bytes)?;
        self.deliver(inbound).await
    }
}

async fn recv<T>(rx: oneshot::Receiver<T>) -> Result<T, RoomdeckError> {
    rx.await.map_err(|_| RoomdeckError::ClientClosed)
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

struct ClientActor<S: MatchmakingService, F: ViewFactory> {
    actions: SessionActions<S, F>,
    receiver: mpsc::Receiver<Command>,
    events: mpsc::UnboundedSender<ClientEvent>,
}

impl<S: MatchmakingService, F: ViewFactory> ClientActor<S, F> {
    async fn run(mut self) {
        tracing::info!(region = %self.actions.region(), "client started");

        while let Some(command) = self.receiver.recv().await {
            if matches!(command, Command::Shutdown) {
                tracing::info!("client shutting down");
                break;
            }
            self.dispatch(command);
            self.flush();
        }

        tracing::info!("client stopped");
    }

    fn dispatch(&mut self, command: Command) {
        match command {
            Command::CreateRoom {
                name,
                max_players,
                visible,
                region,
                reply,
            } => {
                let result = self.actions.create_room(&name, max_players, visible, &region);
                let _ = reply.send(result);
            }
            Command::JoinRoom { name, reply } => {
                let _ = reply.send(self.actions.join_room_by_name(&name));
            }
            Command::JoinSelected { reply } => {
                let _ = reply.send(self.actions.join_selected());
            }
            Command::SelectRoom { name, reply } => {
                let _ = reply.send(self.actions.select_room(&name));
            }
            Command::Refresh { region } => self.actions.refresh(&region),
            Command::LeaveBrowsing => self.actions.leave_browsing(),
            Command::SetNickname { nickname } => self.actions.set_nickname(&nickname),
            Command::LeaveRoom { reply } => {
                let _ = reply.send(self.actions.leave_room());
            }
            Command::Connect { reply } => {
                let _ = reply.send(self.actions.connect());
            }
            Command::Disconnect => self.actions.disconnect(),
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            Command::Service(inbound) => self.actions.handle(inbound),
            Command::Shutdown => {}
        }
    }

    /// Forwards queued events. Dropped silently if nobody is listening.
    fn flush(&mut self) {
        for event in self.actions.drain_events() {
            let _ = self.events.send(event);
        }
    }

    fn snapshot(&self) -> ClientSnapshot {
        let coordinator = self.actions.coordinator();
        ClientSnapshot {
            state: coordinator.state(),
            generation: coordinator.generation(),
            region: self.actions.region().to_string(),
            rooms: coordinator.directory().rooms().into_iter().cloned().collect(),
            selected: coordinator.selected_room().map(|r| r.name.clone()),
            presence: coordinator.presence().cloned(),
            nickname: coordinator.nickname().map(str::to_string),
        }
    }
}

/// Spawns the client event loop.
///
/// Returns the UI handle, the service-side sender, and the stream of
/// [`ClientEvent`]s. The loop stops on [`ClientHandle::shutdown`] or once
/// every handle and sender has been dropped.
pub fn spawn_client<S, F>(
    service: S,
    factory: F,
    config: ClientConfig,
) -> (
    ClientHandle,
    ServiceSender,
    mpsc::UnboundedReceiver<ClientEvent>,
)
where
    S: MatchmakingService + Send + 'static,
    F: ViewFactory + Send + 'static,
    F::View: Send,
{
    let (tx, rx) = mpsc::channel(config.command_channel_size);
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let actor = ClientActor {
        actions: SessionActions::new(service, factory, config.coordinator),
        receiver: rx,
        events: events_tx,
    };

    tokio::spawn(actor.run());

    (
        ClientHandle { sender: tx.clone() },
        ServiceSender { sender: tx },
        events_rx,
    )
}
