//! Runtime configuration resolved from environment variables
//!
//! Desktop builds read a `.env` file; mobile builds ship `assets/config.env`
//! and apply it with [`parse_env_lines`] before anything reads the environment.

use crate::catalog::DEFAULT_API_BASE;
use crate::entitlement::{CodeBook, DEFAULT_GOLD_MARKER};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_REMINDER_DELAY_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a whole number of seconds, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub image_base: String,
    pub redeem_codes: Vec<String>,
    pub gold_marker: String,
    pub data_dir: Option<PathBuf>,
    pub reminder_delay: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = get("TMDB_API_KEY");
        if api_key.is_none() {
            tracing::warn!("TMDB_API_KEY not set; only cached listings will be shown");
        }

        let redeem_codes: Vec<String> = get("REDEEM_CODES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|code| !code.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if redeem_codes.is_empty() {
            tracing::warn!("REDEEM_CODES not set; every redemption will be rejected");
        }

        let reminder_delay = match get("REMINDER_DELAY_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidNumber {
                    key: "REMINDER_DELAY_SECS",
                    value: raw,
                })?,
            None => Duration::from_secs(DEFAULT_REMINDER_DELAY_SECS),
        };

        Ok(Self {
            api_base: get("TMDB_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_key,
            image_base: get("TMDB_IMAGE_BASE").unwrap_or_else(|| DEFAULT_IMAGE_BASE.to_string()),
            redeem_codes,
            gold_marker: get("REDEEM_GOLD_MARKER")
                .unwrap_or_else(|| DEFAULT_GOLD_MARKER.to_string()),
            data_dir: get("MOVIENIGHT_DATA_DIR").map(PathBuf::from),
            reminder_delay,
        })
    }

    pub fn code_book(&self) -> CodeBook {
        CodeBook::new(self.redeem_codes.iter().cloned(), self.gold_marker.clone())
    }
}

/// Parse `KEY=VALUE` lines, skipping blanks and `#` comments.
pub fn parse_env_lines(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}
