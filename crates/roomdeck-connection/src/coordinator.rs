//! The connection coordinator: one per client session.
//!
//! The coordinator is the only thing that talks to the
//! [`MatchmakingService`] and the only owner of the [`ConnectionState`],
//! the [`DirectoryCache`], the selected room and the room presence. A
//! disconnect clears the cache and the selection in the same call that
//! changes the state.
//!
//! # Concurrency note
//!
//! `Coordinator` is synchronous and not thread-safe by itself. It is meant
//! to be owned by a single task (see `roomdeck::spawn_client`) that feeds
//! it user intents and service callbacks one at a time, in arrival order.
//!
//! # Cancellation
//!
//! Every connect and every disconnect bumps the [`Generation`]. Requests
//! carry the generation current when they were issued, and
//! [`handle`](Coordinator::handle) drops any callback whose generation is
//! not current. A region switch is a disconnect followed by a connect in
//! the same call, so nothing from the old region can slip in between.

use std::collections::VecDeque;

use rand::Rng;
use roomdeck_directory::{DirectoryCache, DirectoryChange, ViewFactory};
use roomdeck_protocol::{
    ActorNumber, Generation, Inbound, Player, RoomRecord, RoomSnapshot, RoomUpdate,
    ServiceEvent,
};

use crate::{
    ClientEvent, ConnectionError, ConnectionState, CoordinatorConfig, Intent,
    MatchmakingService, RoomPresence,
};

/// Drives the connection state machine against a matchmaking service.
///
/// ## Lifecycle
///
/// ```text
/// connect() ──→ [Connecting] ──ConnectedToMaster──→ [ConnectedToMaster]
///                                                          │ join_lobby
///                                                          ▼
///            submit(intent) ←──────────────────────── [InLobby]
///                 │                                        ↑
///                 ▼                        JoinFailed      │
///           [JoiningRoom] ─────────────────────────────────┘
///                 │ JoinedRoom
///                 ▼
///             [InRoom] ──leave_room() / LeftRoom──→ [ConnectedToMaster]
/// ```
pub struct Coordinator<S: MatchmakingService, F: ViewFactory> {
    service: S,
    config: CoordinatorConfig,

    state: ConnectionState,

    /// Bumped on every connect and disconnect.
    generation: Generation,

    /// Region fixed on the service configuration for the next connect.
    region: String,

    directory: DirectoryCache<F>,

    /// Name of the highlighted room. Resolved against `directory` on use.
    selected: Option<String>,

    /// Membership of the current room, while in one.
    presence: Option<RoomPresence>,

    /// `None` until the user sets one or a default is assigned.
    nickname: Option<String>,

    /// Room whose create/join request has not been answered yet. Survives
    /// a fall back to the lobby so the late answer can still be matched.
    joining: Option<String>,

    /// Set between `leave_room()` and the service's `LeftRoom`.
    leaving: bool,

    /// Whether the lobby has been entered since the last connect.
    lobby_greeted: bool,

    /// A create/join request waiting for the lobby. At most one.
    pending: Option<Intent>,

    /// Notifications for the host, drained after each call.
    events: VecDeque<ClientEvent>,
}

impl<S: MatchmakingService, F: ViewFactory> Coordinator<S, F> {
    /// Creates a disconnected coordinator with an empty directory.
    pub fn new(service: S, factory: F, config: CoordinatorConfig) -> Self {
        let region = config.default_region.clone();
        Self {
            service,
            config,
            state: ConnectionState::Disconnected,
            generation: Generation::default(),
            region,
            directory: DirectoryCache::new(factory),
            selected: None,
            presence: None,
            nickname: None,
            joining: None,
            leaving: false,
            lobby_greeted: false,
            pending: None,
            events: VecDeque::new(),
        }
    }

    // =====================================================================
    // Requests
    // =====================================================================

    /// Starts connecting to the current region.
    ///
    /// Does nothing (and returns `false`) unless the client is
    /// `Disconnected`: a second connect while one is in flight must never
    /// reach the service.
    pub fn connect(&mut self) -> bool {
        if self.state != ConnectionState::Disconnected {
            tracing::debug!(state = %self.state, "connect ignored, already connecting or connected");
            return false;
        }

        self.generation = self.generation.next();
        self.lobby_greeted = false;
        self.transition(ConnectionState::Connecting);
        tracing::info!(region = %self.region, generation = %self.generation, "connecting");
        self.service.connect(&self.region, self.generation);
        true
    }

    /// Drops the connection from any state.
    ///
    /// Clears the directory, the selected room and the room presence, and
    /// fails a queued intent with [`ConnectionError::NotConnected`].
    pub fn disconnect(&mut self) {
        if self.state == ConnectionState::Disconnected {
            tracing::debug!("disconnect ignored, already disconnected");
            return;
        }
        self.service.disconnect();
        self.reset("disconnect requested");
    }

    /// Switches to `region` and reconnects.
    ///
    /// Disconnect and reconnect happen within this one call, so no
    /// room-list batch can be applied between them. Any callback still in
    /// flight for the old region carries a stale generation and is
    /// dropped. The directory is filtered to `region` from here on.
    pub fn region_changed(&mut self, region: &str) {
        tracing::info!(from = %self.region, to = %region, "region changed, reconnecting");
        self.region = region.to_string();
        self.disconnect();
        let changes = self.directory.retain_region(region);
        self.publish(changes);
        self.connect();
    }

    /// Issues `intent` now if the client is in the lobby; otherwise queues
    /// it until the lobby is reached, connecting first if needed.
    ///
    /// # Errors
    /// [`ConnectionError::Busy`] if a join is in flight, the client is
    /// already in a room, or another intent is already queued.
    pub fn submit(&mut self, intent: Intent) -> Result<(), ConnectionError> {
        match self.state {
            ConnectionState::InLobby => {
                if let Some(room) = &self.joining {
                    tracing::debug!(%room, "earlier join still unanswered, rejecting");
                    return Err(ConnectionError::Busy(self.state));
                }
                self.issue(intent);
                Ok(())
            }
            ConnectionState::Disconnected => {
                tracing::info!(room = %intent.room_name(), "not connected, queuing until lobby");
                self.pending = Some(intent);
                self.connect();
                Ok(())
            }
            ConnectionState::Connecting | ConnectionState::ConnectedToMaster => {
                if self.pending.is_some() {
                    return Err(ConnectionError::Busy(self.state));
                }
                tracing::info!(room = %intent.room_name(), "connection in progress, queuing until lobby");
                self.pending = Some(intent);
                Ok(())
            }
            ConnectionState::JoiningRoom | ConnectionState::InRoom => {
                Err(ConnectionError::Busy(self.state))
            }
        }
    }

    /// Leaves the current room. The service answers with `LeftRoom`.
    ///
    /// # Errors
    /// - [`ConnectionError::NotInRoom`] unless the client is `InRoom`.
    /// - [`ConnectionError::Busy`] if a leave is already in flight.
    pub fn leave_room(&mut self) -> Result<(), ConnectionError> {
        if self.state != ConnectionState::InRoom {
            return Err(ConnectionError::NotInRoom);
        }
        if self.leaving {
            return Err(ConnectionError::Busy(self.state));
        }
        self.leaving = true;
        tracing::info!(generation = %self.generation, "leaving room");
        self.service.leave_room(self.generation);
        Ok(())
    }

    /// Sets the nickname chosen by the user. Forwarded to the service
    /// right away when connected, otherwise on the next lobby entry.
    pub fn set_nickname(&mut self, nickname: &str) {
        self.nickname = Some(nickname.to_string());
        if self.state.is_connected() {
            self.service.set_nickname(nickname);
        }
    }

    /// Highlights a room. Returns `false` if no such room is cached, in
    /// which case the selection is cleared.
    pub fn select_room(&mut self, name: &str) -> bool {
        if self.directory.contains(name) {
            self.selected = Some(name.to_string());
            true
        } else {
            self.selected = None;
            false
        }
    }

    /// Prunes the directory to `region` without reconnecting.
    pub fn prune_to_region(&mut self, region: &str) {
        let changes = self.directory.retain_region(region);
        self.publish(changes);
    }

    /// Empties the directory, e.g. when the user leaves the room browser.
    pub fn clear_directory(&mut self) {
        let changes = self.directory.clear();
        self.publish(changes);
        self.selected = None;
    }

    // =====================================================================
    // Callbacks
    // =====================================================================

    /// Applies one service callback.
    ///
    /// Every callback resolves to exactly one outcome: a transition, a
    /// cache mutation, a presence update, or a logged no-op. Nothing here
    /// can leave the coordinator in an undefined state.
    pub fn handle(&mut self, inbound: Inbound) {
        if inbound.generation != self.generation {
            tracing::debug!(
                event = inbound.event.kind(),
                stale = %inbound.generation,
                current = %self.generation,
                "dropping callback from superseded attempt"
            );
            return;
        }

        let state = self.state;
        match inbound.event {
            ServiceEvent::ConnectedToMaster => match state {
                ConnectionState::Connecting => self.enter_master(),
                _ => self.ignore("ConnectedToMaster"),
            },

            ServiceEvent::ConnectFailed { cause } => match state {
                ConnectionState::Connecting | ConnectionState::ConnectedToMaster => {
                    tracing::warn!(%cause, "connect failed");
                    self.emit(ClientEvent::ConnectFailed {
                        cause: cause.clone(),
                    });
                    self.reset(&cause);
                }
                _ => self.ignore("ConnectFailed"),
            },

            ServiceEvent::Disconnected { cause } => match state {
                ConnectionState::Disconnected => self.ignore("Disconnected"),
                _ => {
                    tracing::info!(%cause, "service disconnected");
                    self.reset(&cause);
                }
            },

            ServiceEvent::JoinedLobby => match state {
                ConnectionState::ConnectedToMaster => self.enter_lobby(),
                _ => self.ignore("JoinedLobby"),
            },

            ServiceEvent::RoomListUpdate { rooms } => self.apply_room_list(&rooms),

            ServiceEvent::JoinedRoom { room } => match state {
                ConnectionState::JoiningRoom => self.enter_room(room),
                // The client gave up waiting, but the service still placed
                // it in the room it asked for.
                ConnectionState::InLobby if self.joining.as_deref() == Some(room.name.as_str()) => {
                    tracing::info!(room = %room.name, "late answer to abandoned join, entering room");
                    self.enter_room(room);
                }
                _ => self.ignore("JoinedRoom"),
            },

            ServiceEvent::JoinFailed { code, message } => match state {
                ConnectionState::JoiningRoom => {
                    tracing::warn!(code, %message, "join failed");
                    self.joining = None;
                    self.emit(ClientEvent::JoinFailed { code, message });
                    self.transition(ConnectionState::InLobby);
                }
                ConnectionState::InLobby if self.joining.is_some() => {
                    tracing::info!(code, %message, "abandoned join failed");
                    self.joining = None;
                    self.emit(ClientEvent::JoinFailed { code, message });
                }
                _ => self.ignore("JoinFailed"),
            },

            ServiceEvent::LeftRoom => match state {
                ConnectionState::InRoom => {
                    self.leaving = false;
                    self.presence = None;
                    self.enter_master();
                }
                _ => self.ignore("LeftRoom"),
            },

            ServiceEvent::PlayerEntered { player } => self.player_entered(player),
            ServiceEvent::PlayerLeft { actor } => self.player_left(actor),
            ServiceEvent::MasterClientSwitched { master } => self.master_switched(master),

            ServiceEvent::Error { code, message } => {
                tracing::warn!(code, %message, %state, "service error");
                self.emit(ClientEvent::ServiceError {
                    code,
                    message: message.clone(),
                });
                self.fall_back(&message);
            }

            ServiceEvent::Unrecognized => {
                tracing::warn!(%state, "unrecognized service callback");
                self.fall_back("unrecognized service callback");
            }
        }
    }

    // =====================================================================
    // Queries
    // =====================================================================

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Region used by the current (or next) connection.
    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn directory(&self) -> &DirectoryCache<F> {
        &self.directory
    }

    /// The selected room, if one is selected and still cached.
    pub fn selected_room(&self) -> Option<&RoomRecord> {
        self.selected
            .as_deref()
            .and_then(|name| self.directory.get(name))
    }

    pub fn presence(&self) -> Option<&RoomPresence> {
        self.presence.as_ref()
    }

    /// `true` if the client is in a room and holds the master role.
    pub fn is_master_client(&self) -> bool {
        self.presence
            .as_ref()
            .is_some_and(RoomPresence::is_master_client)
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    pub fn pending_intent(&self) -> Option<&Intent> {
        self.pending.as_ref()
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    /// Takes every notification queued since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<ClientEvent> {
        self.events.drain(..).collect()
    }

    // =====================================================================
    // Transitions
    // =====================================================================

    fn transition(&mut self, to: ConnectionState) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        tracing::info!(%from, %to, generation = %self.generation, "state changed");
        self.emit(ClientEvent::StateChanged { from, to });
    }

    /// Entered `ConnectedToMaster`. The service takes the client out of the
    /// lobby on every connect and on every room entry, so the lobby is
    /// always re-joined from here.
    fn enter_master(&mut self) {
        self.transition(ConnectionState::ConnectedToMaster);
        self.service.join_lobby(self.generation);
    }

    fn enter_lobby(&mut self) {
        self.transition(ConnectionState::InLobby);

        if !self.lobby_greeted {
            self.lobby_greeted = true;
            self.greet();
        }

        if let Some(intent) = self.pending.take() {
            tracing::info!(room = %intent.room_name(), "lobby reached, issuing queued request");
            self.issue(intent);
        }
    }

    /// First lobby entry after a connect: make sure the service knows our
    /// nickname, generating one if the user never picked it.
    fn greet(&mut self) {
        let nickname = match self.nickname.clone() {
            Some(nickname) => nickname,
            None => {
                let number: u32 = rand::rng().random_range(0..1000);
                let generated = format!("{}{number}", self.config.nickname_prefix);
                tracing::info!(nickname = %generated, "assigned default nickname");
                self.nickname = Some(generated.clone());
                self.emit(ClientEvent::NicknameAssigned(generated.clone()));
                generated
            }
        };
        self.service.set_nickname(&nickname);
    }

    /// Sends a create/join request. Caller guarantees the client is in
    /// the lobby.
    fn issue(&mut self, intent: Intent) {
        self.joining = Some(intent.room_name().to_string());
        self.transition(ConnectionState::JoiningRoom);
        match intent {
            Intent::CreateRoom { name, options } => {
                tracing::info!(room = %name, max_players = options.max_players, "creating or joining room");
                self.service
                    .create_or_join_room(&name, &options, self.generation);
            }
            Intent::JoinRoom { name } => {
                tracing::info!(room = %name, "joining room");
                self.service.join_room(&name, self.generation);
            }
        }
    }

    fn enter_room(&mut self, snapshot: RoomSnapshot) {
        self.joining = None;
        let presence = RoomPresence::from_snapshot(snapshot);
        let room = presence.name().to_string();
        tracing::info!(
            %room,
            players = presence.player_count(),
            master = %presence.master(),
            "joined room"
        );
        self.presence = Some(presence.clone());
        self.transition(ConnectionState::InRoom);
        self.emit(ClientEvent::EnterRoom {
            room,
            scene: self.config.session_scene.clone(),
        });
        self.emit(ClientEvent::MasterClientChanged {
            master: presence.master(),
            is_local: presence.is_master_client(),
        });
        self.emit(ClientEvent::PresenceChanged(presence));
    }

    /// Back to `Disconnected`, dropping everything tied to the old
    /// connection.
    fn reset(&mut self, cause: &str) {
        self.generation = self.generation.next();
        self.joining = None;
        self.leaving = false;
        self.lobby_greeted = false;
        self.presence = None;
        self.selected = None;

        let changes = self.directory.clear();
        self.publish(changes);

        if let Some(intent) = self.pending.take() {
            tracing::info!(room = %intent.room_name(), %cause, "queued request dropped");
            self.emit(ClientEvent::IntentFailed {
                intent,
                error: ConnectionError::NotConnected,
            });
        }

        self.transition(ConnectionState::Disconnected);
    }

    /// Falls back to the nearest stable state after an error.
    fn fall_back(&mut self, cause: &str) {
        if self.state.is_stable() {
            return;
        }
        match self.state.stable_fallback() {
            ConnectionState::Disconnected => {
                self.service.disconnect();
                self.reset(cause);
            }
            target => self.transition(target),
        }
    }

    fn ignore(&self, event: &str) {
        tracing::debug!(%event, state = %self.state, "callback not expected in this state, ignoring");
    }

    // =====================================================================
    // Directory and presence
    // =====================================================================

    fn apply_room_list(&mut self, rooms: &[RoomUpdate]) {
        if !self.state.accepts_room_list() {
            tracing::debug!(
                state = %self.state,
                rooms = rooms.len(),
                "dropping room list received before connect completed"
            );
            return;
        }
        let outcome = self.directory.apply_batch(rooms);
        tracing::debug!(
            added = outcome.added(),
            updated = outcome.updated(),
            removed = outcome.removed(),
            ignored = outcome.ignored,
            cached = self.directory.len(),
            "room list reconciled"
        );
        self.publish(outcome.changes);
    }

    /// Forwards cache changes as events. A removal of the selected room
    /// also clears the selection.
    fn publish(&mut self, changes: Vec<DirectoryChange>) {
        for change in changes {
            let event = match change {
                DirectoryChange::Added(record) => ClientEvent::RoomAdded(record),
                DirectoryChange::Updated(record) => ClientEvent::RoomUpdated(record),
                DirectoryChange::Removed(name) => {
                    if self.selected.as_deref() == Some(name.as_str()) {
                        tracing::debug!(room = %name, "selected room removed, clearing selection");
                        self.selected = None;
                    }
                    ClientEvent::RoomRemoved(name)
                }
            };
            self.emit(event);
        }
    }

    fn player_entered(&mut self, player: Player) {
        let Some(presence) = self.presence.as_mut() else {
            return self.ignore("PlayerEntered");
        };
        tracing::info!(actor = %player.actor, nickname = %player.nickname, "player entered room");
        presence.add_player(player);
        let snapshot = presence.clone();
        self.emit(ClientEvent::PresenceChanged(snapshot));
    }

    fn player_left(&mut self, actor: ActorNumber) {
        let Some(presence) = self.presence.as_mut() else {
            return self.ignore("PlayerLeft");
        };
        if !presence.remove_player(actor) {
            tracing::debug!(%actor, "unknown player left, ignoring");
            return;
        }
        tracing::info!(%actor, "player left room");
        let snapshot = presence.clone();
        self.emit(ClientEvent::PresenceChanged(snapshot));
    }

    fn master_switched(&mut self, master: ActorNumber) {
        let Some(presence) = self.presence.as_mut() else {
            return self.ignore("MasterClientSwitched");
        };
        if !presence.switch_master(master) {
            return;
        }
        let is_local = presence.is_master_client();
        tracing::info!(%master, is_local, "master client switched");
        self.emit(ClientEvent::MasterClientChanged { master, is_local });
    }

    fn emit(&mut self, event: ClientEvent) {
        self.events.push_back(event);
    }
}

// =========================================================================
// Tests
// =========================================================================
