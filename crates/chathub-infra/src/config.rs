//! Configuration loader for Chat Hub.
//!
//! Reads `config.toml` from the data directory and deserializes it into
//! [`HubConfig`], falling back to defaults when the file is missing or
//! malformed. `CHAT_HUB_*` environment variables then override file values.

use std::path::{Path, PathBuf};

use chathub_types::config::HubConfig;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "CHAT_HUB_DATA_DIR";

const HOST_ENV: &str = "CHAT_HUB_HOST";
const PORT_ENV: &str = "CHAT_HUB_PORT";
const DEBUG_ENV: &str = "CHAT_HUB_DEBUG";

/// Resolve the data directory.
///
/// Priority:
/// 1. `CHAT_HUB_DATA_DIR` environment variable
/// 2. `./data`
pub fn resolve_data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: defaults.
/// - Unreadable or unparsable file: logs a warning, defaults.
///
/// The returned config always points at `data_dir`, whatever the file says.
pub async fn load_hub_config(data_dir: &Path) -> HubConfig {
    let config_path = data_dir.join("config.toml");

    let mut config = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => match toml::from_str::<HubConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    "Failed to parse {}: {err}, using defaults",
                    config_path.display()
                );
                HubConfig::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            HubConfig::default()
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            HubConfig::default()
        }
    };

    config.data_dir = data_dir.to_path_buf();
    config
}

/// Override `config` with `CHAT_HUB_HOST`, `CHAT_HUB_PORT` and `CHAT_HUB_DEBUG`.
///
/// `lookup` is normally `|name| std::env::var(name).ok()`. Values that fail
/// to parse are logged and ignored.
pub fn apply_env_overrides(config: &mut HubConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(host) = lookup(HOST_ENV) {
        config.host = host;
    }

    if let Some(port) = lookup(PORT_ENV) {
        match port.parse::<u16>() {
            Ok(port) => config.port = port,
            Err(err) => tracing::warn!("Ignoring {PORT_ENV}={port}: {err}"),
        }
    }

    if let Some(raw) = lookup(DEBUG_ENV) {
        match parse_flag(&raw) {
            Some(flag) => config.debug = flag,
            None => tracing::warn!("Ignoring {DEBUG_ENV}={raw}: expected true or false"),
        }
    }
}

/// Load `config.toml` from `data_dir` and apply process environment overrides.
pub async fn load_with_env(data_dir: &Path) -> HubConfig {
    let mut config = load_hub_config(data_dir).await;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[tokio::test]
    async fn load_hub_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_hub_config(tmp.path()).await;
        assert_eq!(config.port, 10200);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.bots.is_empty());
        assert_eq!(config.data_dir, tmp.path());
    }

    #[tokio::test]
    async fn load_hub_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
port = 9000
debug = true
bots = ["bot-001", "bot-002"]
placeholder_reply = "hold on"
"#,
        )
        .await
        .unwrap();

        let config = load_hub_config(tmp.path()).await;
        assert_eq!(config.port, 9000);
        assert!(config.debug);
        assert_eq!(config.bots, vec!["bot-001", "bot-002"]);
        assert_eq!(config.placeholder_reply, "hold on");
        assert!(config.persist_replies);
    }

    #[tokio::test]
    async fn load_hub_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_hub_config(tmp.path()).await;
        assert_eq!(config.port, 10200);
        assert_eq!(config.data_dir, tmp.path());
    }

    #[tokio::test]
    async fn load_hub_config_ignores_data_dir_in_file() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "data_dir = \"/elsewhere\"")
            .await
            .unwrap();

        let config = load_hub_config(tmp.path()).await;
        assert_eq!(config.data_dir, tmp.path());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = HubConfig {
            port: 9000,
            ..HubConfig::default()
        };
        apply_env_overrides(
            &mut config,
            env(&[
                ("CHAT_HUB_HOST", "127.0.0.1"),
                ("CHAT_HUB_PORT", "8081"),
                ("CHAT_HUB_DEBUG", "TRUE"),
            ]),
        );

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8081);
        assert!(config.debug);
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let mut config = HubConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[("CHAT_HUB_PORT", "not-a-port"), ("CHAT_HUB_DEBUG", "maybe")]),
        );

        assert_eq!(config.port, 10200);
        assert!(!config.debug);
    }

    #[test]
    fn env_debug_can_turn_off_file_debug() {
        let mut config = HubConfig {
            debug: true,
            ..HubConfig::default()
        };
        apply_env_overrides(&mut config, env(&[("CHAT_HUB_DEBUG", "off")]));
        assert!(!config.debug);

        apply_env_overrides(&mut config, env(&[("CHAT_HUB_DEBUG", "garbage")]));
        assert!(!config.debug);
    }

    #[test]
    fn parse_flag_accepts_common_spellings() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" on "), Some(true));
        assert_eq!(parse_flag("No"), Some(false));
        assert_eq!(parse_flag(""), None);
    }
}
