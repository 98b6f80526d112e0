//! # Agent Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults (below)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. Environment overrides                                              │
//! │     GEOPRICE_API_URL         → api_base_url                            │
//! │     GEOPRICE_GEO_URL         → geolocation_url ("" disables lookup)    │
//! │     GEOPRICE_DEFAULT_COUNTRY → default_country                         │
//! │     GEOPRICE_LOCALE          → locale                                  │
//! │     GEOPRICE_DEBOUNCE_MS     → debounce_ms                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  3. validate()                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AgentError, AgentResult};
use geoprice_core::validation::normalize_country_code;

/// Default pricing API base (the `/api` prefix included).
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default IP geolocation endpoint. Must answer `{"country_code": "XX"}`.
pub const DEFAULT_GEO_URL: &str = "https://ipapi.co/json/";

/// Settings for one agent instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Pricing API base URL, e.g. `https://prices.example.com/api`.
    #[serde(default = "default_api_url")]
    pub api_base_url: String,

    /// IP geolocation endpoint. `None` skips straight to the locale.
    #[serde(default = "default_geo_url")]
    pub geolocation_url: Option<String>,

    /// Visitor locale such as `en-US` or `de_DE.UTF-8`.
    #[serde(default)]
    pub locale: Option<String>,

    /// Country used when every detection source fails.
    #[serde(default = "default_country")]
    pub default_country: String,

    /// Quiet period that coalesces bursts of page mutations.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Per-request timeout for geolocation and rule fetch.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_geo_url() -> Option<String> {
    Some(DEFAULT_GEO_URL.to_string())
}

fn default_country() -> String {
    "US".to_string()
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            api_base_url: default_api_url(),
            geolocation_url: default_geo_url(),
            locale: None,
            default_country: default_country(),
            debounce_ms: default_debounce_ms(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl AgentConfig {
    /// Creates a config pointing at the given API base.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        AgentConfig {
            api_base_url: api_base_url.into(),
            ..Default::default()
        }
    }

    /// Defaults plus environment overrides, validated.
    pub fn from_env() -> AgentResult<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Like [`from_env`](Self::from_env), falling back to defaults on error.
    pub fn from_env_or_default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            warn!("Invalid agent config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Checks URLs and the default country.
    pub fn validate(&self) -> AgentResult<()> {
        if !is_http_url(&self.api_base_url) {
            return Err(AgentError::InvalidConfig(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api_base_url
            )));
        }

        if let Some(ref url) = self.geolocation_url {
            if !is_http_url(url) {
                return Err(AgentError::InvalidConfig(format!(
                    "Geolocation URL must start with http:// or https://, got: {}",
                    url
                )));
            }
        }

        normalize_country_code(&self.default_country)
            .map_err(|e| AgentError::InvalidConfig(format!("default_country: {}", e)))?;

        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// API base without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("GEOPRICE_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api_base_url = url;
        }

        if let Ok(url) = std::env::var("GEOPRICE_GEO_URL") {
            debug!(url = %url, "Overriding geolocation URL from environment");
            self.geolocation_url = if url.trim().is_empty() { None } else { Some(url) };
        }

        if let Ok(code) = std::env::var("GEOPRICE_DEFAULT_COUNTRY") {
            self.default_country = code.trim().to_ascii_uppercase();
        }

        if let Ok(locale) = std::env::var("GEOPRICE_LOCALE") {
            self.locale = Some(locale);
        }

        if let Ok(ms) = std::env::var("GEOPRICE_DEBOUNCE_MS") {
            match ms.parse() {
                Ok(ms) => self.debounce_ms = ms,
                Err(_) => warn!(value = %ms, "Ignoring invalid GEOPRICE_DEBOUNCE_MS"),
            }
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
