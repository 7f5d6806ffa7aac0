//! Application configuration
//!
//! Everything is optional; a missing file or section falls back to the
//! defaults below. Loaded from YAML:
//!
//! ```yaml
//! secrets:
//!   region: us-east-2
//! klaviyo:
//!   revision: "2024-10-15"
//!   max_retries: 3
//!   max_delay_secs: 60
//!   rate_limit:
//!     requests_per_second: 3
//!     burst_size: 3
//! google:
//!   delegated_email: automation@futuretilt.com
//! ```

use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use crate::secrets::DEFAULT_REGION;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Secret store settings
    pub secrets: SecretsConfig,
    /// Marketing platform client settings
    pub klaviyo: KlaviyoConfig,
    /// Google API settings
    pub google: GoogleConfig,
    /// Shared HTTP settings
    pub http: HttpConfig,
}

impl AppConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// Load configuration from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    AppConfig::from_yaml_str(&contents)
}

/// Secret store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    /// AWS region holding the secrets
    pub region: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
        }
    }
}

/// Marketing platform client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KlaviyoConfig {
    /// API base URL
    pub base_url: String,
    /// API revision header value
    pub revision: String,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Longest single wait between retries, in seconds
    pub max_delay_secs: u64,
    /// Client-side throttling
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for KlaviyoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://a.klaviyo.com/api".to_string(),
            revision: "2024-10-15".to_string(),
            max_retries: 3,
            max_delay_secs: 60,
            rate_limit: Some(RateLimiterConfig::new(3, 3)),
        }
    }
}

impl KlaviyoConfig {
    /// Apply optional retry overrides
    #[must_use]
    pub fn with_retry_overrides(mut self, max_delay: Option<u64>, max_retries: Option<u32>) -> Self {
        if let Some(delay) = max_delay {
            self.max_delay_secs = delay;
        }
        if let Some(retries) = max_retries {
            self.max_retries = retries;
        }
        self
    }

    /// Longest single wait between retries
    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs)
    }
}

/// Google API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// User impersonated through domain-wide delegation
    pub delegated_email: String,
    /// Sheets API base URL
    pub sheets_base_url: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            delegated_email: "automation@futuretilt.com".to_string(),
            sheets_base_url: "https://sheets.googleapis.com/v4".to_string(),
        }
    }
}

/// Shared HTTP settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl HttpConfig {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
