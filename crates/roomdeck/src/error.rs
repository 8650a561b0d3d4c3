//! Unified error type for Roomdeck.

use roomdeck_connection::{ActionError, ConnectionError, ValidationError};
use roomdeck_protocol::ProtocolError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `roomdeck` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant generates a `From` impl, so `?` converts
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RoomdeckError {
    /// Inbound bytes could not be decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A request was rejected before reaching the service.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The service refused a request, or the client was busy.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// The client's event loop has stopped.
    #[error("client event loop is closed")]
    ClientClosed,
}

impl From<ActionError> for RoomdeckError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::Validation(e) => Self::Validation(e),
            ActionError::Connection(e) => Self::Connection(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use roomdeck_connection::ConnectionState;
    use roomdeck_protocol::{Codec, Inbound, JsonCodec};

    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err = JsonCodec
            .decode::<Inbound>(b"not json")
            .expect_err("garbage must not decode");
        let roomdeck_err: RoomdeckError = err.into();
        assert!(matches!(roomdeck_err, RoomdeckError::Protocol(_)));
        assert!(roomdeck_err.to_string().starts_with("decode failed"));
    }

    #[test]
    fn test_from_action_error_unwraps_variant() {
        let err: RoomdeckError = ActionError::from(ValidationError::EmptyName).into();
        assert!(matches!(err, RoomdeckError::Validation(ValidationError::EmptyName)));

        let err: RoomdeckError =
            ActionError::from(ConnectionError::Busy(ConnectionState::InRoom)).into();
        assert!(matches!(err, RoomdeckError::Connection(ConnectionError::Busy(_))));
    }

    #[test]
    fn test_client_closed_message() {
        assert_eq!(
            RoomdeckError::ClientClosed.to_string(),
            "client event loop is closed"
        );
    }
}
