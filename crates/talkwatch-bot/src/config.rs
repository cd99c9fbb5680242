//! Bot configuration.
//!
//! Values come from a TOML file with per-field defaults, then environment
//! overrides using the variable names the deployment has always used
//! (`NEW_DATA_FILE`, `CHAT_IDS`). The bot token is deliberately env-only
//! (`TELEGRAM_API_KEY`) and never lives in the config file; it is read in
//! `main` when the Telegram transport is built.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Talks-data document to watch.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Where the last-known-good snapshot is persisted.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    /// Telegram chat IDs to notify.
    #[serde(default)]
    pub chat_ids: Vec<i64>,
    /// Poll the data file on a fixed interval instead of using filesystem
    /// notifications.
    #[serde(default)]
    pub poll: bool,
    /// Poll interval in seconds (only used with `poll = true`).
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Telegram Bot API base URL. Overridable for testing against a stub.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("new.json")
}

fn default_state_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("talkwatch")
        .join("current.json")
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            state_file: default_state_file(),
            chat_ids: Vec::new(),
            poll: false,
            poll_interval_secs: default_poll_interval_secs(),
            api_url: default_api_url(),
        }
    }
}

impl Config {
    /// Load config from a specific file path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Load config from the default location (config/default.toml) or fall
    /// back to defaults.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from("config/default.toml");
        if config_path.exists() {
            return Self::load_from(&config_path);
        }
        Ok(Config::default())
    }

    /// Apply environment overrides on top of file/default values.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("NEW_DATA_FILE") {
            self.data_file = PathBuf::from(path);
        }
        if let Ok(ids) = std::env::var("CHAT_IDS") {
            self.chat_ids = parse_chat_ids(&ids).context("parsing CHAT_IDS")?;
        }
        Ok(())
    }
}

/// Parse a comma-separated chat ID list, ignoring empty segments.
pub fn parse_chat_ids(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .with_context(|| format!("invalid chat id '{s}'"))
        })
        .collect()
}
