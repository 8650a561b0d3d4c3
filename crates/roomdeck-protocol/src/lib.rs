//! Shared vocabulary for Roomdeck.
//!
//! This crate defines the values that cross the boundary between the
//! client core and the external matchmaking service:
//!
//! - **Types** ([`RoomRecord`], [`RoomUpdate`], [`ServiceEvent`],
//!   [`Inbound`], [`Generation`], etc.): what the service tells us and
//!   what we ask of it.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how inbound callbacks
//!   are turned into those types when they arrive as bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong while decoding.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about caches or state machines. It
//! only describes the data:
//!
//! ```text
//! Service (bytes/callbacks) → Protocol (Inbound) → Directory / Connection
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
mod error;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

// Users write `use roomdeck_protocol::RoomRecord` instead of reaching into
// the `types` module.

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ActorNumber, Generation, Inbound, Player, REGION_PROPERTY, RoomOptions,
    RoomRecord, RoomSnapshot, RoomUpdate, ServiceEvent,
};
