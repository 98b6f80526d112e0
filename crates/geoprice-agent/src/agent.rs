//! # Injection Agent
//!
//! Wires detection, rule fetch, the pricing context and the page watcher
//! into one lifecycle:
//!
//! ```text
//! Agent::run
//!   ├── detect country          (geolocation → locale → default)
//!   ├── fetch active rules      (empty on failure)
//!   ├── update pass             (PricingContext::update_prices)
//!   └── watch page events       (until the channel closes)
//! ```

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::client::{http_client, RuleClient};
use crate::config::AgentConfig;
use crate::context::PricingContext;
use crate::detect::{CountryDetector, DetectedCountry};
use crate::page::Storefront;
use crate::watch::{watch_page, PageEvent, WatchStats};

/// The storefront injection agent.
#[derive(Debug, Clone)]
pub struct Agent {
    config: AgentConfig,
    detector: CountryDetector,
    rules: RuleClient,
}

impl Agent {
    pub fn new(config: AgentConfig) -> Self {
        let client = http_client(config.request_timeout()).unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to a default HTTP client");
            reqwest::Client::new()
        });

        Agent {
            detector: CountryDetector::new(client.clone(), &config),
            rules: RuleClient::new(client, &config),
            config,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Detects the country only.
    pub async fn detect_country(&self) -> DetectedCountry {
        self.detector.detect().await
    }

    /// Detects the country and loads its rules.
    pub async fn init(&self) -> PricingContext {
        let country = self.detect_country().await;
        let rules = self.rules.fetch_rules(&country.code).await;

        info!(country = %country.code, rules = rules.len(), "Agent initialized");
        PricingContext::new(country.code, rules)
    }

    /// Initializes, prices the page, then follows page events until the
    /// sender side is dropped.
    pub async fn run(
        &self,
        page: &mut dyn Storefront,
        mut events: mpsc::Receiver<PageEvent>,
    ) -> (PricingContext, WatchStats) {
        let mut context = self.init().await;
        context.update_prices(page);

        let stats = watch_page(&mut context, page, &mut events, self.config.debounce()).await;
        (context, stats)
    }
}
