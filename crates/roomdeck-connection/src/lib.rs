//! Connection coordination for Roomdeck.
//!
//! This crate owns the client's side of the conversation with the
//! matchmaking service:
//!
//! 1. **State machine**: where the client is ([`ConnectionState`]), one of
//!    disconnected, connecting, on the master server, in the lobby,
//!    joining a room, in a room
//! 2. **Coordination**: turning requests into service calls and service
//!    callbacks into transitions ([`Coordinator`])
//! 3. **Cancellation**: tagging every request with a [`Generation`] so
//!    callbacks for superseded attempts are dropped
//! 4. **Presence**: who is in the current room and who is master
//!    ([`RoomPresence`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Client layer (above)  ← user intents, async event loop
//!     ↕
//! Connection layer (this crate)  ← state machine, owns the directory cache
//!     ↕
//! Directory layer / Protocol layer (below)
//! ```
//!
//! [`Generation`]: roomdeck_protocol::Generation

mod config;
mod coordinator;
mod error;
mod event;
mod presence;
mod service;
mod state;

pub use config::CoordinatorConfig;
pub use coordinator::Coordinator;
pub use error::{ActionError, ConnectionError, ValidationError};
pub use event::{ClientEvent, Intent};
pub use presence::RoomPresence;
pub use service::{MatchmakingService, RecordingService, ServiceCall};
pub use state::ConnectionState;
