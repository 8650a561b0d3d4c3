//! Client configuration.

use roomdeck_connection::CoordinatorConfig;
use serde::{Deserialize, Serialize};

/// Settings for [`spawn_client`](crate::spawn_client).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Passed through to the coordinator.
    pub coordinator: CoordinatorConfig,

    /// Capacity of the queue feeding the event loop. When it is full,
    /// senders wait.
    pub command_channel_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            coordinator: CoordinatorConfig::default(),
            command_channel_size: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"coordinator":{"default_region":"us"}}"#).expect("valid json");
        assert_eq!(config.coordinator.default_region, "us");
        assert_eq!(config.coordinator.session_scene, "Lobby Scene");
        assert_eq!(config.command_channel_size, 64);
    }
}
