//! # Domain Types
//!
//! Core domain types used throughout GeoPrice.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   1 ──── * ┌─────────────────────┐                 │
//! │  │    Country      │◄───────────│     PriceRule       │                 │
//! │  │  ─────────────  │            │  ─────────────────  │                 │
//! │  │  id             │            │  id, country_id     │                 │
//! │  │  name           │            │  rule_type, value   │                 │
//! │  │  code ("US")    │            │  product_category   │                 │
//! │  │  active         │            │  product_id         │                 │
//! │  └─────────────────┘            │  priority, active   │                 │
//! │                                 └─────────────────────┘                 │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │  PriceContext   │   │    RuleType     │   │ PriceRuleWithCountry│   │
//! │  │  product_id     │   │  Percentage     │   │  rule + embedded    │   │
//! │  │  category       │   │  Fixed          │   │  CountrySummary     │   │
//! │  │  base_price     │   └─────────────────┘   └─────────────────────┘   │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Wire format is camelCase JSON, matching what the admin UI and the
//! storefront script exchange with the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::ALL_CATEGORIES;

// =============================================================================
// Country
// =============================================================================

/// A country visitors can be priced for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: i64,

    /// Display name ("Germany").
    pub name: String,

    /// Two uppercase letters, unique across all countries.
    pub code: String,

    /// Inactive countries stay editable but are hidden from the storefront list.
    pub active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Country {
    /// Returns the id/name/code triple embedded in price rule responses.
    pub fn summary(&self) -> CountrySummary {
        CountrySummary {
            id: self.id,
            name: self.name.clone(),
            code: self.code.clone(),
        }
    }
}

/// The slice of a country embedded in price rule listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CountrySummary {
    pub id: i64,
    pub name: String,
    pub code: String,
}

// =============================================================================
// Rule Type
// =============================================================================

/// How a rule's `value` adjusts the base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    /// `value` is in percentage points: `base * (1 + value / 100)`.
    Percentage,
    /// `value` is in currency units: `base + value`.
    Fixed,
}

impl RuleType {
    /// Wire/database spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Percentage => "percentage",
            RuleType::Fixed => "fixed",
        }
    }
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RuleType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "percentage" => Ok(RuleType::Percentage),
            "fixed" => Ok(RuleType::Fixed),
            _ => Err(ValidationError::NotAllowed {
                field: "type".to_string(),
                allowed: vec!["percentage".to_string(), "fixed".to_string()],
            }),
        }
    }
}

// =============================================================================
// Price Rule
// =============================================================================

/// One conditional price adjustment for a country.
///
/// ## Scope
/// - `product_id = None` matches every product
/// - `product_category = "all"` matches every category
///
/// ## Ordering
/// Higher `priority` wins. Ties go to the most recently created rule,
/// then to the higher id (see [`crate::resolver::rule_order`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceRule {
    pub id: i64,

    #[serde(default)]
    pub country_id: i64,

    #[serde(rename = "type")]
    pub rule_type: RuleType,

    /// Percentage points or currency units, depending on `rule_type`.
    pub value: f64,

    #[serde(default = "default_category")]
    pub product_category: String,

    #[serde(default)]
    pub product_id: Option<String>,

    /// Stored and editable, never read by the resolver.
    #[serde(default)]
    pub min_order_value: f64,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub priority: i64,

    /// Lean payloads without timestamps decode as the Unix epoch.
    #[serde(default)]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

fn default_category() -> String {
    ALL_CATEGORIES.to_string()
}

fn default_true() -> bool {
    true
}

impl PriceRule {
    /// Creates an active, unscoped rule with priority 0.
    ///
    /// Timestamps default to the Unix epoch; stores overwrite them.
    pub fn new(country_id: i64, rule_type: RuleType, value: f64) -> Self {
        PriceRule {
            id: 0,
            country_id,
            rule_type,
            value,
            product_category: default_category(),
            product_id: None,
            min_order_value: 0.0,
            active: true,
            description: None,
            priority: 0,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.product_category = category.into();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }

    /// Applies a validated partial update in place.
    pub fn apply(&mut self, changes: &PriceRuleChanges) {
        if let Some(country_id) = changes.country_id {
            self.country_id = country_id;
        }
        if let Some(rule_type) = changes.rule_type {
            self.rule_type = rule_type;
        }
        if let Some(value) = changes.value {
            self.value = value;
        }
        if let Some(ref category) = changes.product_category {
            self.product_category = category.clone();
        }
        if let Some(ref product_id) = changes.product_id {
            self.product_id = product_id.clone();
        }
        if let Some(min_order_value) = changes.min_order_value {
            self.min_order_value = min_order_value;
        }
        if let Some(active) = changes.active {
            self.active = active;
        }
        if let Some(ref description) = changes.description {
            self.description = description.clone();
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
    }
}

/// A price rule with its country embedded, as listed to the admin UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceRuleWithCountry {
    #[serde(flatten)]
    pub rule: PriceRule,

    /// `None` only if the country vanished underneath the rule.
    pub country: Option<CountrySummary>,
}

/// Filters for listing price rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleFilter {
    pub active: Option<bool>,
    pub country_id: Option<i64>,
}

// =============================================================================
// Price Context
// =============================================================================

/// What the storefront knows about the product being priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceContext {
    pub product_id: Option<String>,
    pub product_category: Option<String>,
    pub base_price: f64,
}

impl PriceContext {
    /// A context with no product or category information.
    pub fn new(base_price: f64) -> Self {
        PriceContext {
            product_id: None,
            product_category: None,
            base_price,
        }
    }

    pub fn with_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.product_category = Some(category.into());
        self
    }
}

// =============================================================================
// Admin Inputs
// =============================================================================
// Request bodies as received. Every field is optional at this layer so that
// missing fields become ValidationErrors (HTTP 400) instead of decode errors.

/// Body of `POST /api/countries`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCountry {
    pub name: Option<String>,
    pub code: Option<String>,
    pub active: Option<bool>,
}

/// Body of `PUT /api/countries/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryUpdate {
    pub name: Option<String>,
    pub code: Option<String>,
    pub active: Option<bool>,
}

/// Body of `POST /api/prices`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPriceRule {
    pub country_id: Option<i64>,
    #[serde(rename = "type")]
    pub rule_type: Option<String>,
    pub value: Option<f64>,
    pub product_category: Option<String>,
    pub product_id: Option<String>,
    pub min_order_value: Option<f64>,
    pub active: Option<bool>,
    pub description: Option<String>,
    pub priority: Option<i64>,
}

/// Body of `PUT /api/prices/:id`.
///
/// `productId` and `description` distinguish "absent" (keep) from
/// `null` (clear).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRuleUpdate {
    pub country_id: Option<i64>,
    #[serde(rename = "type")]
    pub rule_type: Option<String>,
    pub value: Option<f64>,
    pub product_category: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub product_id: Option<Option<String>>,
    pub min_order_value: Option<f64>,
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub priority: Option<i64>,
}

/// Maps a present JSON value (including `null`) to `Some(..)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Validated Inputs
// =============================================================================
// Produced by the `validation` module; consumed by the store.

/// A country ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryDraft {
    pub name: String,
    pub code: String,
    pub active: bool,
}

/// Validated partial update of a country.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryChanges {
    pub name: Option<String>,
    pub code: Option<String>,
    pub active: Option<bool>,
}

impl CountryChanges {
    /// Applies the changes to an existing record in place.
    pub fn apply_to(&self, country: &mut Country) {
        if let Some(ref name) = self.name {
            country.name = name.clone();
        }
        if let Some(ref code) = self.code {
            country.code = code.clone();
        }
        if let Some(active) = self.active {
            country.active = active;
        }
    }
}

/// A price rule ready to insert (defaults applied).
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRuleDraft {
    pub country_id: i64,
    pub rule_type: RuleType,
    pub value: f64,
    pub product_category: String,
    pub product_id: Option<String>,
    pub min_order_value: f64,
    pub active: bool,
    pub description: Option<String>,
    pub priority: i64,
}

/// Validated partial update of a price rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceRuleChanges {
    pub country_id: Option<i64>,
    pub rule_type: Option<RuleType>,
    pub value: Option<f64>,
    pub product_category: Option<String>,
    pub product_id: Option<Option<String>>,
    pub min_order_value: Option<f64>,
    pub active: Option<bool>,
    pub description: Option<Option<String>>,
    pub priority: Option<i64>,
}

// =============================================================================
// Unit Tests
// =============================================================================
