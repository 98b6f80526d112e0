//! # Price Calculation
//!
//! The result shape of `POST /api/prices/calculate`, and the pure step
//! that produces it once the country and its active rules are known.
//! Lookup of the country and its rules lives in `geoprice-db`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::resolver::resolve;
use crate::types::{Country, PriceContext, PriceRule};

/// A priced product, as returned to the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceCalculation {
    pub original_price: f64,

    /// Unrounded. Display layers format to two decimals.
    pub adjusted_price: f64,

    pub country_code: String,
    pub country_name: String,

    /// `None` when no active rule matched.
    pub applied_rule: Option<PriceRule>,
}

/// Resolves `context` against `rules` and labels the result with `country`.
///
/// `rules` are expected to be the country's active rules; their order
/// does not matter.
pub fn calculate(country: &Country, rules: &[PriceRule], context: &PriceContext) -> PriceCalculation {
    let resolution = resolve(rules, context);

    PriceCalculation {
        original_price: context.base_price,
        adjusted_price: resolution.adjusted_price,
        country_code: country.code.clone(),
        country_name: country.name.clone(),
        applied_rule: resolution.applied_rule,
    }
}
