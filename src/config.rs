//! Configuration file handling.
//!
//! The configuration file is a small JSON document, `conf/config.json` by
//! default, holding the bank API token and the retry policy. A missing or
//! malformed file aborts the run before any network call is made.

use crate::Result;
use anyhow::{bail, Context};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Backoff delays, in seconds, between statement fetch attempts. The number
/// of delays bounds the retries: `len + 1` attempts total.
const DEFAULT_RETRY_DELAYS: [u64; 4] = [10, 20, 30, 60];

/// The runtime configuration, loaded from a JSON file.
///
/// Example:
/// ```json
/// {
///   "api_token": "your-api-token",
///   "statement_retry_delays": [10, 20, 30, 60],
///   "retry_exchange_rates": false
/// }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// The bank API token, sent as the `X-Token` header.
    api_token: String,

    /// Seconds to wait between statement fetch attempts.
    #[serde(default = "default_retry_delays")]
    statement_retry_delays: Vec<u64>,

    /// Whether the daily exchange-rate fetch uses the same retry policy as
    /// statement fetches. Off by default: the rate service is not rate
    /// limited the way the bank API is.
    #[serde(default)]
    retry_exchange_rates: bool,
}

fn default_retry_delays() -> Vec<u64> {
    DEFAULT_RETRY_DELAYS.to_vec()
}

impl Config {
    /// Loads and validates the configuration from `path`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("The config file is missing '{}'", path.display());
        }
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
        anyhow::ensure!(
            !config.api_token.trim().is_empty(),
            "api_token in {} must not be empty",
            path.display()
        );
        Ok(config)
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn statement_retry_delays(&self) -> Vec<Duration> {
        self.statement_retry_delays
            .iter()
            .map(|s| Duration::from_secs(*s))
            .collect()
    }

    pub fn retry_exchange_rates(&self) -> bool {
        self.retry_exchange_rates
    }

    #[cfg(test)]
    pub(crate) fn new_for_test(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            statement_retry_delays: default_retry_delays(),
            retry_exchange_rates: false,
        }
    }
}
