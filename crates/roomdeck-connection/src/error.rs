//! Error types for the connection layer.
//!
//! Nothing here is fatal. Every error is reported to the caller (or the
//! UI) and leaves the coordinator in a defined, stable state.

use crate::ConnectionState;

/// A request was rejected before anything was sent to the service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Create and join requests need a room name.
    #[error("room name must not be empty")]
    EmptyName,
}

/// The service could not be reached, or refused a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// The connection was lost or failed before a queued request could be
    /// sent.
    #[error("not connected to the matchmaking service")]
    NotConnected,

    /// A conflicting request is already outstanding. The client never
    /// issues overlapping requests.
    #[error("another request is in progress (state: {0})")]
    Busy(ConnectionState),

    /// The operation needs the client to be in a room.
    #[error("not in a room")]
    NotInRoom,

    /// The service rejected the connect request.
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    /// The service rejected a create or join request.
    #[error("join failed ({code}): {message}")]
    JoinFailed { code: i16, message: String },

    /// The service reported an error outside any single request.
    #[error("service error ({code}): {message}")]
    Service { code: i16, message: String },
}

/// Error returned by user-facing actions.
///
/// `#[from]` lets `?` lift either kind into an `ActionError`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_from_validation() {
        let err: ActionError = ValidationError::EmptyName.into();
        assert!(matches!(err, ActionError::Validation(ValidationError::EmptyName)));
        assert_eq!(err.to_string(), "room name must not be empty");
    }

    #[test]
    fn test_busy_names_the_state() {
        let err = ConnectionError::Busy(ConnectionState::JoiningRoom);
        assert!(err.to_string().contains("JoiningRoom"));
    }

    #[test]
    fn test_join_failed_shows_code_and_message() {
        let err = ConnectionError::JoinFailed {
            code: 32765,
            message: "Game full".into(),
        };
        assert_eq!(err.to_string(), "join failed (32765): Game full");
    }
}
