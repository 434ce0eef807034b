//! Application configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/tally/config.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! API keys never live in the file. `LookupConfig::with_env_keys` copies
//! them from `CURRENCY_API_KEY` and `SHARES_API_KEY`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::UserSettings;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/tally.toml");

/// Settings for the currency and stock lookup clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// Currency the rates are expressed in
    pub base_currency: String,
    pub currency_url: String,
    pub stocks_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    pub currency_api_key: Option<String>,
    pub stocks_api_key: Option<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_currency: "RUB".to_string(),
            currency_url: "https://v6.exchangerate-api.com".to_string(),
            stocks_url: "https://financialmodelingprep.com".to_string(),
            timeout: Duration::from_secs(10),
            currency_api_key: None,
            stocks_api_key: None,
        }
    }
}

impl LookupConfig {
    /// Point both services at one base URL (mock servers in tests)
    pub fn with_base_url(mut self, url: &str) -> Self {
        let url = url.trim_end_matches('/').to_string();
        self.currency_url = url.clone();
        self.stocks_url = url;
        self
    }

    pub fn with_keys(mut self, currency: &str, stocks: &str) -> Self {
        self.currency_api_key = Some(currency.to_string());
        self.stocks_api_key = Some(stocks.to_string());
        self
    }

    /// Fill API keys from the environment, keeping any already set
    pub fn with_env_keys(mut self) -> Self {
        if self.currency_api_key.is_none() {
            self.currency_api_key = non_empty_env("CURRENCY_API_KEY");
        }
        if self.stocks_api_key.is_none() {
            self.stocks_api_key = non_empty_env("SHARES_API_KEY");
        }
        self
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Ledger CSV used when no path is given on the command line
    pub ledger_path: PathBuf,
    pub lookups: LookupConfig,
    /// Directory for archived reports; archiving is off when unset
    pub report_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from("data/operations.csv"),
            lookups: LookupConfig::default(),
            report_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration (explicit path or data-dir override, then defaults)
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let path = match override_path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        let content = match path {
            Some(ref p) => {
                debug!("Loading config from {}", p.display());
                fs::read_to_string(p).map_err(|e| {
                    Error::InvalidData(format!("Failed to read config {}: {}", p.display(), e))
                })?
            }
            None => DEFAULT_CONFIG.to_string(),
        };

        parse_config(&content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    ledger: Option<RawLedger>,
    lookups: Option<RawLookups>,
    reports: Option<RawReports>,
}

#[derive(Debug, Deserialize)]
struct RawLedger {
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawLookups {
    base_currency: Option<String>,
    currency_url: Option<String>,
    stocks_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawReports {
    dir: Option<PathBuf>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<AppConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::InvalidData(format!("Invalid config TOML: {}", e)))?;

    let mut config = AppConfig::default();

    if let Some(path) = raw.ledger.and_then(|l| l.path) {
        config.ledger_path = path;
    }

    if let Some(lookups) = raw.lookups {
        if let Some(base) = lookups.base_currency {
            config.lookups.base_currency = base.to_uppercase();
        }
        if let Some(url) = lookups.currency_url {
            config.lookups.currency_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = lookups.stocks_url {
            config.lookups.stocks_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = lookups.timeout_secs {
            if secs == 0 {
                return Err(Error::InvalidData(
                    "lookups.timeout_secs must be greater than zero".into(),
                ));
            }
            config.lookups.timeout = Duration::from_secs(secs);
        }
    }

    config.report_dir = raw.reports.and_then(|r| r.dir);

    Ok(config)
}

/// Read the user's currency and stock preferences from a JSON file
pub fn load_user_settings(path: &Path) -> Result<UserSettings> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::InvalidData(format!(
            "Failed to read user settings {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(serde_json::from_str(&content)?)
}
