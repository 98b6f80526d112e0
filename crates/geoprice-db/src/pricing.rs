//! # Pricing Service
//!
//! Store-backed price calculation for a country code.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  calculate("tr", context)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  normalize code → "TR"                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  countries.get_by_code ──── None ──► NotFound (HTTP 404)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_rules.list_active_for_country                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  geoprice_core::calculate  (shared resolver)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::error::DbResult;
use crate::repository::country::CountryRepository;
use crate::repository::price_rule::PriceRuleRepository;
use geoprice_core::{calculate, Country, CoreError, PriceCalculation, PriceContext, PriceRule};

/// Looks up a country's active rules and runs the shared resolver on them.
#[derive(Debug, Clone)]
pub struct PricingService {
    countries: CountryRepository,
    price_rules: PriceRuleRepository,
}

impl PricingService {
    pub fn new(countries: CountryRepository, price_rules: PriceRuleRepository) -> Self {
        PricingService {
            countries,
            price_rules,
        }
    }

    /// Calculates the adjusted price of a product for a country code.
    ///
    /// ## Errors
    /// - `NotFound` if no country has this code (whatever rules exist)
    pub async fn calculate(&self, country_code: &str, context: &PriceContext) -> DbResult<PriceCalculation> {
        let (country, rules) = self.country_with_active_rules(country_code).await?;
        let result = calculate(&country, &rules, context);

        debug!(
            country = %result.country_code,
            original = result.original_price,
            adjusted = result.adjusted_price,
            rule_id = result.applied_rule.as_ref().map(|r| r.id),
            "Price calculated"
        );
        Ok(result)
    }

    /// Active rules of the country with this code, in evaluation order.
    ///
    /// This is what the storefront agent downloads.
    pub async fn active_rules_for_code(&self, country_code: &str) -> DbResult<Vec<PriceRule>> {
        let (_, rules) = self.country_with_active_rules(country_code).await?;
        Ok(rules)
    }

    async fn country_with_active_rules(&self, country_code: &str) -> DbResult<(Country, Vec<PriceRule>)> {
        let code = country_code.trim().to_ascii_uppercase();

        let country = self
            .countries
            .get_by_code(&code)
            .await?
            .ok_or(CoreError::CountryNotFound(code))?;

        let rules = self.price_rules.list_active_for_country(country.id).await?;
        Ok((country, rules))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
