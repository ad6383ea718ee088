//! Configuration management
//!
//! Settings are read from a JSON file; every field is optional:
//! ```json
//! {
//!   "openingBalance": "0",
//!   "maxRemoteBalance": 100,
//!   "fetchLatencyMs": 0,
//!   "fetchJitterMs": 0,
//!   "apiBaseUrl": "https://jsonplaceholder.typicode.com",
//!   "throttleMs": 5000,
//!   "filesBaseDir": "."
//! }
//! ```
//!
//! The `cute-bank` binary only uses the account fields. `apiBaseUrl`,
//! `throttleMs` and `filesBaseDir` are read by library users through
//! [`Config::api`] and [`Config::file_reader`].

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    account::RemoteSettings,
    api::{ApiError, DEFAULT_BASE_URL, DEFAULT_THROTTLE, ThrottledApi},
    file_reader::FileReader,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Config {
    /// Balance of accounts opened on first use
    pub opening_balance: Decimal,
    pub max_remote_balance: u32,
    pub fetch_latency_ms: u64,
    pub fetch_jitter_ms: u64,
    /// Library only, see [`Config::api`]
    pub api_base_url: String,
    /// Library only, see [`Config::api`]
    pub throttle_ms: u64,
    /// Library only, see [`Config::file_reader`]
    pub files_base_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let remote = RemoteSettings::default();
        Self {
            opening_balance: Decimal::ZERO,
            max_remote_balance: remote.max_balance,
            fetch_latency_ms: remote.latency.as_millis() as u64,
            fetch_jitter_ms: remote.jitter.as_millis() as u64,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            throttle_ms: DEFAULT_THROTTLE.as_millis() as u64,
            files_base_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config `{}`", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid config `{}`", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        if config.opening_balance.is_sign_negative() {
            anyhow::bail!("openingBalance must not be negative");
        }
        Ok(config)
    }

    pub fn remote_settings(&self) -> RemoteSettings {
        RemoteSettings {
            max_balance: self.max_remote_balance,
            latency: Duration::from_millis(self.fetch_latency_ms),
            jitter: Duration::from_millis(self.fetch_jitter_ms),
        }
    }

    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn file_reader(&self) -> FileReader {
        FileReader::new(&self.files_base_dir)
    }

    pub fn api(&self) -> Result<ThrottledApi, ApiError> {
        ThrottledApi::new(&self.api_base_url, self.throttle_interval())
    }
}
