//! Runtime configuration, read from the environment (and `.env` when present).

use std::env;

use dotenv::dotenv;
use thiserror::Error;

/// Prefix used for text commands when `COMMAND_PREFIX` is not set
pub const DEFAULT_PREFIX: &str = ".";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub command_prefix: String,
}

impl Config {
    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let command_prefix = lookup("COMMAND_PREFIX")
            .map(|prefix| prefix.trim().to_string())
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

        Ok(Self {
            discord_token,
            command_prefix,
        })
    }
}
