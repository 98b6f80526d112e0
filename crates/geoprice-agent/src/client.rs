//! # Rule Client
//!
//! Downloads a country's active price rules from the pricing API:
//! `GET {api_base}/prices/country-code/{code}`.
//!
//! Any failure (transport, non-2xx, undecodable body) is logged and turned
//! into an empty rule set, which leaves storefront prices unadjusted.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AgentConfig;
use crate::error::{AgentError, AgentResult};
use geoprice_core::PriceRule;

/// Builds the HTTP client shared by detection and rule fetch.
pub fn http_client(timeout: Duration) -> AgentResult<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
        .map_err(AgentError::from)
}

/// Client for the rule endpoint of the pricing API.
#[derive(Debug, Clone)]
pub struct RuleClient {
    client: Client,
    api_base: String,
}

impl RuleClient {
    pub fn new(client: Client, config: &AgentConfig) -> Self {
        RuleClient {
            client,
            api_base: config.api_base().to_string(),
        }
    }

    /// URL of the active-rules endpoint for a country code.
    pub fn rules_url(&self, country_code: &str) -> String {
        format!("{}/prices/country-code/{}", self.api_base, country_code)
    }

    /// Active rules for a country; empty on any failure.
    pub async fn fetch_rules(&self, country_code: &str) -> Vec<PriceRule> {
        match self.try_fetch_rules(country_code).await {
            Ok(rules) => {
                info!(country = %country_code, count = rules.len(), "Loaded price rules");
                rules
            }
            Err(e) => {
                warn!(country = %country_code, error = %e, "Error fetching price rules");
                Vec::new()
            }
        }
    }

    /// Active rules for a country, surfacing the failure.
    pub async fn try_fetch_rules(&self, country_code: &str) -> AgentResult<Vec<PriceRule>> {
        let url = self.rules_url(country_code);
        debug!(url = %url, "Fetching price rules");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AgentError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        Ok(response.json::<Vec<PriceRule>>().await?)
    }
}
