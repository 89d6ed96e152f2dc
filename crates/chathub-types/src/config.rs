//! Process configuration for Chat Hub.
//!
//! `HubConfig` is built once at startup (defaults, then `config.toml`, then
//! environment, then CLI flags) and passed down explicitly.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "chat_hub.db";

/// Default reply produced by the placeholder bot handler.
pub const DEFAULT_PLACEHOLDER_REPLY: &str = "Received. Message handling is not implemented yet.";

/// Top-level configuration for the hub process.
///
/// Loaded from `{data_dir}/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Enables debug-level logging.
    #[serde(default)]
    pub debug: bool,

    /// Directory holding the SQLite database and `config.toml`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Bot ids to register with the placeholder handler at startup.
    #[serde(default)]
    pub bots: Vec<String>,

    /// Text the placeholder handler replies with.
    #[serde(default = "default_placeholder_reply")]
    pub placeholder_reply: String,

    /// Whether the placeholder handler also stores its own replies.
    #[serde(default = "default_persist_replies")]
    pub persist_replies: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10200
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_placeholder_reply() -> String {
    DEFAULT_PLACEHOLDER_REPLY.to_string()
}

fn default_persist_replies() -> bool {
    true
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
            data_dir: default_data_dir(),
            bots: Vec::new(),
            placeholder_reply: default_placeholder_reply(),
            persist_replies: default_persist_replies(),
        }
    }
}

impl HubConfig {
    /// `host:port` string for binding the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Path of the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    /// sqlx connection URL for the database, created on first use.
    pub fn database_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.database_path().display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_config_default_values() {
        let config = HubConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 10200);
        assert!(!config.debug);
        assert!(config.bots.is_empty());
        assert!(config.persist_replies);
        assert_eq!(config.bind_addr(), "0.0.0.0:10200");
    }

    #[test]
    fn test_hub_config_deserialize_with_defaults() {
        let config: HubConfig = toml::from_str("").unwrap();
        assert_eq!(config, HubConfig::default());
    }

    #[test]
    fn test_hub_config_deserialize_with_values() {
        let toml_str = r#"
host = "127.0.0.1"
port = 8000
debug = true
bots = ["bot-001", "bot-002"]
placeholder_reply = "hi there"
"#;
        let config: HubConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert!(config.debug);
        assert_eq!(config.bots, vec!["bot-001", "bot-002"]);
        assert_eq!(config.placeholder_reply, "hi there");
    }

    #[test]
    fn test_database_url() {
        let config = HubConfig {
            data_dir: PathBuf::from("/tmp/hub"),
            ..HubConfig::default()
        };
        assert_eq!(config.database_url(), "sqlite:///tmp/hub/chat_hub.db?mode=rwc");
    }
}
