//! Application settings.

use std::path::PathBuf;

/// Bot settings, driven by environment variables.
#[derive(Debug, Clone)]
pub struct BotSettings {
    /// Bot API token (obtain from `@BotFather`).
    pub bot_token: String,

    /// Minimum minutes an actor must wait between karma grants.
    pub karma_update_delay_mins: i64,

    /// Path to the SQLite user database.
    pub database_path: PathBuf,

    /// Path to the restaurants JSON file.
    pub restaurants_path: PathBuf,

    /// Telegram-side long-poll timeout in seconds.
    pub poll_timeout_secs: u64,

    /// Log level for the application.
    pub log_level: String,
}

fn default_karma_update_delay() -> i64 {
    5
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_database_path() -> PathBuf {
    PathBuf::from("karmabot.db")
}

fn default_restaurants_path() -> PathBuf {
    PathBuf::from("restaurants.json")
}

fn default_log_level() -> String {
    "info".to_owned()
}

impl BotSettings {
    /// Creates settings from environment variables.
    ///
    /// `BOT_TOKEN` is required; everything else falls back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `BOT_TOKEN` is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token =
            std::env::var("BOT_TOKEN").map_err(|_| ConfigError::MissingEnvVar("BOT_TOKEN"))?;

        Ok(Self {
            bot_token,
            karma_update_delay_mins: std::env::var("KARMA_UPDATE_DELAY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_karma_update_delay),
            database_path: std::env::var("DATABASE_PATH")
                .map_or_else(|_| default_database_path(), PathBuf::from),
            restaurants_path: std::env::var("RESTAURANTS_PATH")
                .map_or_else(|_| default_restaurants_path(), PathBuf::from),
            poll_timeout_secs: std::env::var("POLL_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_poll_timeout),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| default_log_level()),
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(default_karma_update_delay(), 5);
        assert_eq!(default_poll_timeout(), 30);
        assert_eq!(default_database_path(), PathBuf::from("karmabot.db"));
        assert_eq!(default_log_level(), "info");
    }
}
