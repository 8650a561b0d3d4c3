//! Codec trait and implementations for decoding service callbacks.
//!
//! Hosts that receive matchmaking callbacks as raw bytes (a relay socket, a
//! recorded session, a test fixture) turn them into [`Inbound`](crate::Inbound)
//! values through a [`Codec`]. The rest of Roomdeck never sees bytes.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust values to bytes and decode bytes back.
///
/// `Send + Sync + 'static` lets a codec live inside the client's event
/// loop task for as long as the client runs.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use roomdeck_protocol::{Codec, Generation, Inbound, JsonCodec, ServiceEvent};
///
/// let codec = JsonCodec;
/// let bytes = br#"{"generation":3,"event":{"type":"JoinedLobby"}}"#;
///
/// let inbound: Inbound = codec.decode(bytes).unwrap();
/// assert_eq!(inbound.generation, Generation(3));
/// assert_eq!(inbound.event, ServiceEvent::JoinedLobby);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
