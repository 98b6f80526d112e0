//! # Country Detection
//!
//! Works out which country a visitor is in.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. IP geolocation    GET https://ipapi.co/json/ → "country_code"      │
//! │        │ fails / disabled / unusable                                   │
//! │        ▼                                                                │
//! │  2. Locale region     "en-US" → "US", "de_DE.UTF-8" → "DE"             │
//! │        │ no region subtag                                              │
//! │        ▼                                                                │
//! │  3. Default country   "US"                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Detection never fails; each fallback is logged at `warn`.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::AgentConfig;
use crate::error::{AgentError, AgentResult};
use geoprice_core::validation::normalize_country_code;

/// Where a detected country came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSource {
    Geolocation,
    Locale,
    Default,
}

/// A detected, normalized country code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedCountry {
    pub code: String,
    pub source: DetectionSource,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    country_code: Option<String>,
}

/// Detects the visitor's country from the configured sources.
#[derive(Debug, Clone)]
pub struct CountryDetector {
    client: Client,
    geolocation_url: Option<String>,
    locale: Option<String>,
    default_country: String,
}

impl CountryDetector {
    pub fn new(client: Client, config: &AgentConfig) -> Self {
        CountryDetector {
            client,
            geolocation_url: config.geolocation_url.clone(),
            locale: config.locale.clone(),
            default_country: config.default_country.trim().to_ascii_uppercase(),
        }
    }

    /// Tries geolocation, then the locale, then the default country.
    pub async fn detect(&self) -> DetectedCountry {
        if let Some(ref url) = self.geolocation_url {
            match self.geolocate(url).await {
                Ok(code) => {
                    info!(country = %code, "Country detected via geolocation");
                    return DetectedCountry {
                        code,
                        source: DetectionSource::Geolocation,
                    };
                }
                Err(e) => warn!(error = %e, "Geolocation failed, falling back to locale"),
            }
        }

        if let Some(code) = self.locale.as_deref().and_then(locale_region) {
            info!(country = %code, "Country detected via locale");
            return DetectedCountry {
                code,
                source: DetectionSource::Locale,
            };
        }

        warn!(country = %self.default_country, "Using default country");
        DetectedCountry {
            code: self.default_country.clone(),
            source: DetectionSource::Default,
        }
    }

    async fn geolocate(&self, url: &str) -> AgentResult<String> {
        debug!(url = %url, "Requesting geolocation");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AgentError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body: GeoResponse = response.json().await?;
        let raw = body.country_code.ok_or_else(|| AgentError::NoCountry {
            source_name: "geolocation".to_string(),
            reason: "response has no country_code".to_string(),
        })?;

        normalize_country_code(&raw).map_err(|e| AgentError::NoCountry {
            source_name: "geolocation".to_string(),
            reason: e.to_string(),
        })
    }
}

/// Extracts the region subtag of a locale, uppercased.
///
/// Accepts `-` or `_` separators and ignores encoding/modifier suffixes.
/// Returns `None` when no two-letter region is present.
///
/// ```rust
/// use geoprice_agent::detect::locale_region;
///
/// assert_eq!(locale_region("en-US").as_deref(), Some("US"));
/// assert_eq!(locale_region("tr_tr.UTF-8").as_deref(), Some("TR"));
/// assert_eq!(locale_region("en"), None);
/// ```
pub fn locale_region(locale: &str) -> Option<String> {
    let tag = locale.split(|c: char| c == '.' || c == '@').next().unwrap_or_default();

    tag.split(|c: char| c == '-' || c == '_')
        .skip(1)
        .find(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
        .map(|part| part.to_ascii_uppercase())
}
