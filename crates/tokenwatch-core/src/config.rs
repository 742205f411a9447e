use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, TokenwatchError};
use crate::vault::VaultClient;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Process configuration: authority addressing, the tracked-token source,
/// and tuning knobs. Everything except `VAULT_TOKEN` has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_vault_addr")]
    pub vault_addr: String,
    #[serde(skip_serializing)]
    pub vault_token: String,
    #[serde(default = "default_tokens_file")]
    pub tokens_file: PathBuf,
    /// Renewal increment, in hours. Defaults to about three months.
    #[serde(default = "default_renew_increment_hours")]
    pub renew_increment_hours: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Upper bound on concurrent per-token lookups within one report build.
    #[serde(default = "default_lookup_parallelism")]
    pub lookup_parallelism: usize,
}

/// Largest accepted renewal increment, in hours (100 years). Keeps the
/// hour count inside the range `chrono::Duration` can represent.
pub const MAX_RENEW_INCREMENT_HOURS: u64 = 876_000;

fn default_vault_addr() -> String {
    "http://127.0.0.1:8200".to_string()
}

fn default_tokens_file() -> PathBuf {
    PathBuf::from("/vault/secrets/tokens.yaml")
}

fn default_renew_increment_hours() -> u64 {
    2160
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_lookup_parallelism() -> usize {
    4
}

impl Config {
    /// Read configuration from the environment. `VAULT_TOKEN` is required;
    /// everything else falls back to its default.
    pub fn from_env() -> Result<Self> {
        let vault_token = std::env::var("VAULT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(TokenwatchError::MissingVaultToken)?;
        Ok(Self {
            vault_addr: env_or("VAULT_ADDR", default_vault_addr()),
            vault_token,
            tokens_file: PathBuf::from(env_or(
                "TOKENWATCH_TOKENS_FILE",
                default_tokens_file().display().to_string(),
            )),
            renew_increment_hours: parse_bounded_env(
                "TOKENWATCH_RENEW_INCREMENT_HOURS",
                default_renew_increment_hours(),
                1..=MAX_RENEW_INCREMENT_HOURS,
            )?,
            request_timeout_secs: parse_env(
                "TOKENWATCH_TIMEOUT_SECS",
                default_request_timeout_secs(),
            )?,
            lookup_parallelism: parse_env(
                "TOKENWATCH_LOOKUP_PARALLELISM",
                default_lookup_parallelism(),
            )?,
        })
    }

    /// Renewal increment as a duration. Values past the accepted bound
    /// (possible when the config was deserialized directly) are clamped so
    /// the conversion can never abort the process.
    pub fn renew_increment(&self) -> chrono::Duration {
        let hours = self.renew_increment_hours.min(MAX_RENEW_INCREMENT_HOURS);
        chrono::Duration::hours(hours as i64)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }

    /// Build the shared authority client from this configuration.
    pub fn client(&self) -> Result<VaultClient> {
        VaultClient::new(
            self.vault_addr.clone(),
            self.vault_token.clone(),
            self.request_timeout(),
        )
    }
}

fn env_or(var: &str, default: String) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

fn parse_bounded_env(
    var: &str,
    default: u64,
    bounds: std::ops::RangeInclusive<u64>,
) -> Result<u64> {
    let value: u64 = parse_env(var, default)?;
    if bounds.contains(&value) {
        Ok(value)
    } else {
        Err(TokenwatchError::InvalidEnvVar {
            var: var.to_string(),
            value: value.to_string(),
        })
    }
}

fn parse_env<T: std::str::FromStr>(var: &str, default: T) -> Result<T> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse()
                .map_err(|_| TokenwatchError::InvalidEnvVar {
                    var: var.to_string(),
                    value,
                })
        }
        _ => Ok(default),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
