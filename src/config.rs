//! Configuration and settings management
//!
//! Loads settings from environment variables and defines bot constants.

use crate::activity::parse_duration;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    pub telegram_bot_token: String,

    /// Mute duration used when `/mute` is given no duration
    #[serde(default = "default_mute_duration")]
    pub default_mute_duration: String,

    /// Reply sent to non-admins who try an admin command
    #[serde(default = "default_denial_message")]
    pub denial_message: String,
}

fn default_mute_duration() -> String {
    DEFAULT_MUTE_DURATION.to_string()
}

fn default_denial_message() -> String {
    DEFAULT_DENIAL_MESSAGE.to_string()
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use activity_warden::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            // Not checked into git
            .add_source(File::with_name("config/local").required(false))
            // Eg. `APP__DENIAL_MESSAGE=...` sets `denial_message`
            .add_source(Environment::with_prefix("APP").separator("__"))
            // Plain UPPER_SNAKE_CASE variables, empty values treated as unset
            .add_source(Environment::default().ignore_empty(true))
            .build()?
            .try_deserialize()
    }

    /// Default mute length in seconds, falling back to 48h if the
    /// configured value does not parse.
    #[must_use]
    pub fn default_mute_seconds(&self) -> u64 {
        parse_duration(&self.default_mute_duration).unwrap_or(DEFAULT_MUTE_SECS)
    }
}

/// Mute duration used when none is given.
pub const DEFAULT_MUTE_DURATION: &str = "48h";
/// `DEFAULT_MUTE_DURATION` in seconds.
pub const DEFAULT_MUTE_SECS: u64 = 48 * 3600;
/// Reply to unauthorized command use.
pub const DEFAULT_DENIAL_MESSAGE: &str = "Only VED and admins can use this command.";

// Telegram API retry configuration
/// Retries after the first attempt of an outbound notification
pub const TELEGRAM_API_MAX_RETRIES: usize = 3;
/// Initial backoff between attempts
pub const TELEGRAM_API_INITIAL_BACKOFF_MS: u64 = 500;
/// Backoff cap
pub const TELEGRAM_API_MAX_BACKOFF_MS: u64 = 4000;
