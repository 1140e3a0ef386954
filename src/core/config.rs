//! Runtime configuration
//!
//! Values come from an optional config file (JSON or YAML) and are then
//! overridden by environment variables.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.7.0
//!
//! ## Changelog
//! - 1.1.0: File overlay and run mode selection
//! - 1.0.0: Environment-only configuration

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Which transport(s) this process runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Long-poll the updates endpoint
    Bot,
    /// Serve the webhook endpoint
    Webhook,
    /// Both transports in one process
    Both,
}

impl FromStr for RunMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bot" => Ok(RunMode::Bot),
            "webhook" => Ok(RunMode::Webhook),
            "both" => Ok(RunMode::Both),
            other => Err(anyhow!("Unknown mode: {other}. Use: bot, webhook, or both")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub access_token: String,

    /// Process-wide default timezone descriptor
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_storage_file")]
    pub storage_file: String,

    #[serde(default = "default_max_reminders")]
    pub max_reminders_per_user: usize,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,

    #[serde(default = "default_updates_timeout")]
    pub updates_timeout_seconds: u64,

    #[serde(default)]
    pub webhook_secret: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(skip)]
    pub mode: Option<RunMode>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            timezone: default_timezone(),
            storage_file: default_storage_file(),
            max_reminders_per_user: default_max_reminders(),
            poll_interval_seconds: default_poll_interval(),
            updates_timeout_seconds: default_updates_timeout(),
            webhook_secret: String::new(),
            api_base: default_api_base(),
            port: default_port(),
            log_level: default_log_level(),
            mode: None,
        }
    }
}

impl Config {
    /// Load from `$CONFIG_PATH` (default `config.json`) plus the environment
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.json".to_string());
        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file; YAML is a superset of JSON so both are accepted
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path}"))?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {path}"))?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("MAX_ACCESS_TOKEN").filter(|v| !v.is_empty()) {
            self.access_token = token;
        }
        if let Some(secret) = lookup("WEBHOOK_SECRET").filter(|v| !v.is_empty()) {
            self.webhook_secret = secret;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("PORT must be a number, got '{port}'"))?;
        }
        if let Some(mode) = lookup("BOT_MODE") {
            self.mode = Some(mode.parse()?);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(file) = lookup("STORAGE_FILE") {
            self.storage_file = file;
        }
        if let Some(tz) = lookup("BOT_TIMEZONE") {
            self.timezone = tz;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            return Err(anyhow!(
                "Access token not provided. Set MAX_ACCESS_TOKEN or add access_token to the config file"
            ));
        }
        if self.max_reminders_per_user == 0 {
            return Err(anyhow!("max_reminders_per_user must be at least 1"));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds.max(1))
    }

    pub fn updates_timeout(&self) -> Duration {
        Duration::from_secs(self.updates_timeout_seconds)
    }
}

// Default value functions
fn default_timezone() -> String {
    "UTC+3".to_string()
}

fn default_storage_file() -> String {
    "data/storage.json".to_string()
}

fn default_max_reminders() -> usize {
    10
}

fn default_poll_interval() -> u64 {
    5
}

fn default_updates_timeout() -> u64 {
    30
}

fn default_api_base() -> String {
    "https://platform-api.max.ru".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}
