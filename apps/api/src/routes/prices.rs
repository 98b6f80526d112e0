//! # Price Rule Routes
//!
//! ```text
//! GET    /api/prices                          rules + embedded country
//!                                             ?active=true|false&countryId=N
//! GET    /api/prices/country/{countryId}      all rules of a country
//! GET    /api/prices/country-code/{code}      active rules, storefront feed
//! GET    /api/prices/{id}
//! POST   /api/prices                          201 + created rule
//! PUT    /api/prices/{id}                     partial update
//! DELETE /api/prices/{id}
//! POST   /api/prices/calculate                price for a country/product
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::routes::MessageResponse;
use crate::state::AppState;
use geoprice_core::validation::{prepare_new_rule, prepare_rule_update, validate_finite};
use geoprice_core::{
    PriceCalculation, PriceContext, PriceRule, PriceRuleUpdate, PriceRuleWithCountry, NewPriceRule,
    RuleFilter, ValidationError,
};

pub async fn list_rules(
    State(state): State<AppState>,
    filter: Result<Query<RuleFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<PriceRuleWithCountry>>> {
    let Query(filter) = filter?;
    Ok(Json(state.db().price_rules().list(filter).await?))
}

pub async fn list_rules_for_country(
    State(state): State<AppState>,
    country_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<PriceRule>>> {
    let Path(country_id) = country_id?;
    Ok(Json(state.db().price_rules().list_for_country(country_id).await?))
}

/// Feed read by the storefront agent.
pub async fn list_rules_for_country_code(
    State(state): State<AppState>,
    Path(country_code): Path<String>,
) -> ApiResult<Json<Vec<PriceRule>>> {
    let rules = state.db().pricing().active_rules_for_code(&country_code).await?;
    debug!(country = %country_code, count = rules.len(), "Serving active rules");
    Ok(Json(rules))
}

pub async fn get_rule(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<PriceRuleWithCountry>> {
    let Path(id) = id?;
    state
        .db()
        .price_rules()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Price rule", &id.to_string()))
}

pub async fn create_rule(
    State(state): State<AppState>,
    body: Result<Json<NewPriceRule>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PriceRuleWithCountry>)> {
    let Json(input) = body?;
    let draft = prepare_new_rule(input)?;

    let rule = state.db().price_rules().create(&draft).await?;
    info!(
        id = rule.rule.id,
        country_id = rule.rule.country_id,
        rule_type = %rule.rule.rule_type.as_str(),
        value = rule.rule.value,
        "Price rule created"
    );

    Ok((StatusCode::CREATED, Json(rule)))
}

pub async fn update_rule(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<PriceRuleUpdate>, JsonRejection>,
) -> ApiResult<Json<PriceRuleWithCountry>> {
    let Path(id) = id?;
    let Json(input) = body?;
    let changes = prepare_rule_update(input)?;

    let rule = state.db().price_rules().update(id, &changes).await?;
    info!(id, "Price rule updated");

    Ok(Json(rule))
}

pub async fn delete_rule(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;
    state.db().price_rules().delete(id).await?;
    info!(id, "Price rule deleted");

    Ok(Json(MessageResponse::new("Price rule deleted successfully")))
}

// =============================================================================
// Calculation
// =============================================================================

/// Body of `POST /api/prices/calculate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    pub country_code: Option<String>,
    pub product_id: Option<String>,
    pub product_category: Option<String>,
    pub original_price: Option<PriceInput>,
}

/// A price sent either as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    /// The price as a finite number.
    pub fn amount(&self) -> Result<f64, ValidationError> {
        let value = match self {
            PriceInput::Number(n) => *n,
            PriceInput::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        };
        validate_finite("originalPrice", value)
    }
}

impl CalculateRequest {
    /// Splits the request into a country code and a resolver context.
    pub fn into_context(self) -> Result<(String, PriceContext), ValidationError> {
        let country_code = self
            .country_code
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ValidationError::required("countryCode"))?;

        let base_price = self
            .original_price
            .ok_or_else(|| ValidationError::required("originalPrice"))?
            .amount()?;

        Ok((
            country_code,
            PriceContext {
                product_id: self.product_id,
                product_category: self.product_category,
                base_price,
            },
        ))
    }
}

pub async fn calculate_price(
    State(state): State<AppState>,
    body: Result<Json<CalculateRequest>, JsonRejection>,
) -> ApiResult<Json<PriceCalculation>> {
    let Json(request) = body?;
    let (country_code, context) = request.into_context()?;

    let calculation = state.db().pricing().calculate(&country_code, &context).await?;
    debug!(
        country = %calculation.country_code,
        original = calculation.original_price,
        adjusted = calculation.adjusted_price,
        "Price calculated"
    );

    Ok(Json(calculation))
}
