//! Coordinator configuration.

use serde::{Deserialize, Serialize};

/// Settings for a [`Coordinator`](crate::Coordinator).
///
/// Hosts can override any field and fall back to the defaults for the
/// rest:
///
/// ```rust
/// use roomdeck_connection::CoordinatorConfig;
///
/// let config = CoordinatorConfig {
///     default_region: "us".into(),
///     ..CoordinatorConfig::default()
/// };
/// assert_eq!(config.nickname_prefix, "Player");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Region used for the first connect, before the user picks one.
    pub default_region: String,

    /// Prefix of the nickname assigned when the user never set one. A
    /// random number in `0..1000` is appended.
    pub nickname_prefix: String,

    /// Scene the host should load when the client enters a room. Carried
    /// verbatim on [`ClientEvent::EnterRoom`](crate::ClientEvent::EnterRoom).
    pub session_scene: String,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            default_region: "eu".to_string(),
            nickname_prefix: "Player".to_string(),
            session_scene: "Lobby Scene".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.default_region, "eu");
        assert_eq!(config.nickname_prefix, "Player");
        assert_eq!(config.session_scene, "Lobby Scene");
    }
}
