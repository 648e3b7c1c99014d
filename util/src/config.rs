//! Application configuration loaded from the environment.
//!
//! `AppConfig` is read once at startup (see `api::main`) and then handed to
//! request handlers through [`crate::state::AppState`]. Nothing in the
//! workspace reads configuration from a global.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while reading configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub conflict_check_debounce_ms: u64,
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a map-backed closure instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        Ok(Self {
            env: or("APP_ENV", "development"),
            project_name: or("PROJECT_NAME", "campus-attendance"),
            log_level: or("LOG_LEVEL", "api=info,services=info"),
            log_file: or("LOG_FILE", "api.log"),
            log_to_stdout: parse_bool("LOG_TO_STDOUT", lookup("LOG_TO_STDOUT"), false)?,
            database_path: lookup("DATABASE_PATH").ok_or(ConfigError::Missing("DATABASE_PATH"))?,
            host: or("HOST", "127.0.0.1"),
            port: parse_or("PORT", lookup("PORT"), 3000)?,
            conflict_check_debounce_ms: parse_or(
                "CONFLICT_CHECK_DEBOUNCE_MS",
                lookup("CONFLICT_CHECK_DEBOUNCE_MS"),
                500,
            )?,
        })
    }

    /// Configuration used by tests: in-memory SQLite, quiet logging.
    pub fn for_tests() -> Self {
        Self {
            env: "test".into(),
            project_name: "campus-attendance".into(),
            log_level: "warn".into(),
            log_file: "test.log".into(),
            log_to_stdout: false,
            database_path: "sqlite::memory:".into(),
            host: "127.0.0.1".into(),
            port: 0,
            conflict_check_debounce_ms: 500,
        }
    }

    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }

    pub fn conflict_check_debounce(&self) -> Duration {
        Duration::from_millis(self.conflict_check_debounce_ms)
    }

    /// Socket address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn parse_bool(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::trim) {
        None => Ok(default),
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            key,
            value: other.to_owned(),
        }),
    }
}
