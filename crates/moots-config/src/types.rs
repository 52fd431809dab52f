//! Configuration types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Default backend endpoint.
pub const DEFAULT_SERVER: &str = "http://localhost:9000";

/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding [`ClientConfig::server`].
pub const SERVER_URL_ENV: &str = "MOOTS_SERVER_URL";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the mootslive backend.
    pub server: String,

    /// Timeout for each RPC, in seconds.
    pub timeout_secs: u64,

    /// Directory holding the pending authorization slot.
    /// Defaults to the config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            state_dir: None,
        }
    }
}

impl ClientConfig {
    /// Parse from a TOML string. Missing keys take their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// RPC timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Directory for the pending authorization slot.
    pub fn effective_state_dir(&self, config_dir: &Path) -> PathBuf {
        self.state_dir
            .clone()
            .unwrap_or_else(|| config_dir.to_path_buf())
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(server) = lookup(SERVER_URL_ENV).filter(|s| !s.is_empty()) {
            self.server = server;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.server, "http://localhost:9000");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(
            config.effective_state_dir(Path::new("/cfg")),
            PathBuf::from("/cfg")
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml(r#"server = "https://api.moots.live""#).unwrap();
        assert_eq!(config.server, "https://api.moots.live");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.state_dir.is_none());
    }

    #[test]
    fn test_state_dir_override() {
        let config = ClientConfig::from_toml(r#"state_dir = "/var/lib/moots""#).unwrap();
        assert_eq!(
            config.effective_state_dir(Path::new("/cfg")),
            PathBuf::from("/var/lib/moots")
        );
    }

    #[test]
    fn test_invalid_toml() {
        assert!(ClientConfig::from_toml("timeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ClientConfig {
            server: "https://api.moots.live".to_string(),
            timeout_secs: 5,
            state_dir: Some(PathBuf::from("/tmp/moots")),
        };
        let parsed = ClientConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_env_override() {
        let mut config = ClientConfig::default();
        config.apply_env(|key| (key == SERVER_URL_ENV).then(|| "http://env:1".to_string()));
        assert_eq!(config.server, "http://env:1");

        let mut config = ClientConfig::default();
        config.apply_env(|_| Some(String::new()));
        assert_eq!(config.server, DEFAULT_SERVER);
    }
}
