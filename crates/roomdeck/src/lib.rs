//! # Roomdeck
//!
//! Client-side room directory and connection coordination for multiplayer
//! lobbies.
//!
//! Roomdeck keeps a local copy of the matchmaking service's room list in
//! sync with incremental updates, and drives the client through the
//! connection lifecycle (connect, lobby, join, in room) one well-defined
//! transition at a time. The transport itself is not part of Roomdeck:
//! plug your service SDK in behind the [`MatchmakingService`] trait.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roomdeck::prelude::*;
//!
//! # async fn run() -> Result<(), RoomdeckError> {
//! let (service, mut calls) = ChannelService::new();
//! let (client, callbacks, mut events) =
//!     spawn_client(service, NoViews, ClientConfig::default());
//!
//! client.connect().await?;
//! // Forward each `calls` item to the real SDK, and each SDK callback
//! // to `callbacks.deliver(...)`. Render `events` in the UI.
//! # let _ = (&mut calls, &callbacks, &mut events);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod dispatcher;
mod error;
mod logging;
mod region;
mod service;

pub use client::{ClientHandle, ClientSnapshot, ServiceSender, spawn_client};
pub use config::ClientConfig;
pub use dispatcher::SessionActions;
pub use error::RoomdeckError;
pub use logging::init_tracing;
pub use region::RegionSelector;
pub use service::ChannelService;

/// Everything a host typically needs, in one import.
pub mod prelude {
    pub use roomdeck_connection::{
        ActionError, ClientEvent, ConnectionError, ConnectionState, Coordinator,
        CoordinatorConfig, Intent, MatchmakingService, RecordingService, RoomPresence,
        ServiceCall, ValidationError,
    };
    pub use roomdeck_directory::{
        DirectoryCache, DirectoryChange, NoViews, Reconciliation, ViewFactory,
    };
    pub use roomdeck_protocol::{
        ActorNumber, Codec, Generation, Inbound, JsonCodec, Player, ProtocolError, RoomOptions,
        RoomRecord, RoomSnapshot, RoomUpdate, ServiceEvent,
    };

    pub use crate::{
        ChannelService, ClientConfig, ClientHandle, ClientSnapshot, RegionSelector,
        RoomdeckError, ServiceSender, SessionActions, init_tracing, spawn_client,
    };
}
