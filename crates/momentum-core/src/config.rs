//! TOML configuration with serde defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::MomentumError;

/// Top-level Momentum configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

/// General assistant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

/// Store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelConfig {
    pub telegram: Option<TelegramConfig>,
}

/// Telegram bot config.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: String,
    /// Allowed Telegram user ids. Empty = allow all.
    #[serde(default)]
    pub allowed_users: Vec<i64>,
}

/// Admin panel config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Users allowed to run /admin, /export, and /reset_all.
    #[serde(default)]
    pub user_ids: Vec<i64>,
    /// Confirmation token that must follow /reset_all, matched verbatim.
    #[serde(default = "default_reset_token")]
    pub reset_token: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            user_ids: Vec::new(),
            reset_token: default_reset_token(),
        }
    }
}

fn default_name() -> String {
    "Momentum".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_db_path() -> String {
    "~/.momentum/momentum.db".to_string()
}

fn default_reset_token() -> String {
    "RESET ALL".to_string()
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, MomentumError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| MomentumError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| MomentumError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.assistant.name, "Momentum");
        assert_eq!(config.store.db_path, "~/.momentum/momentum.db");
        assert!(config.channel.telegram.is_none());
        assert_eq!(config.admin.reset_token, "RESET ALL");
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [assistant]
            name = "Momo"
            log_level = "debug"

            [store]
            db_path = "/tmp/test.db"

            [channel.telegram]
            enabled = true
            bot_token = "123:abc"
            allowed_users = [42]

            [admin]
            user_ids = [42]
            reset_token = "WIPE IT"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.assistant.name, "Momo");
        assert_eq!(config.store.db_path, "/tmp/test.db");
        let tg = config.channel.telegram.unwrap();
        assert!(tg.enabled);
        assert_eq!(tg.allowed_users, vec![42]);
        assert_eq!(config.admin.user_ids, vec![42]);
        assert_eq!(config.admin.reset_token, "WIPE IT");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let toml_str = r#"
            [channel.telegram]
            enabled = true
            bot_token = "123:abc"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.assistant.name, "Momentum");
        assert!(config.channel.telegram.unwrap().allowed_users.is_empty());
    }

    #[test]
    fn test_shellexpand() {
        std::env::set_var("HOME", "/home/test");
        assert_eq!(shellexpand("~/x.db"), "/home/test/x.db");
        assert_eq!(shellexpand("/abs/x.db"), "/abs/x.db");
    }
}
