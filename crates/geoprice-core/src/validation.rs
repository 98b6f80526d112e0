//! # Validation Module
//!
//! Turns admin request bodies into validated drafts and change sets.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: axum extractors                                              │
//! │  └── JSON shape (every field optional)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, finite numbers, rule type spelling               │
//! │  ├── Country code normalization (trim + uppercase, 2 letters)          │
//! │  └── Defaults (category "all", active true, priority 0, ...)           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: geoprice-db                                                  │
//! │  ├── Country existence for countryId                                   │
//! │  └── UNIQUE (code), FOREIGN KEY (country_id)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use geoprice_core::validation::normalize_country_code;
//!
//! assert_eq!(normalize_country_code(" tr ").unwrap(), "TR");
//! assert!(normalize_country_code("TUR").is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{
    CountryChanges, CountryDraft, CountryUpdate, NewCountry, NewPriceRule, PriceRuleChanges,
    PriceRuleDraft, PriceRuleUpdate, RuleType,
};
use crate::{ALL_CATEGORIES, COUNTRY_CODE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted country name.
pub const MAX_COUNTRY_NAME_LEN: usize = 100;

// =============================================================================
// Field Validators
// =============================================================================

/// Normalizes a country code to its stored form.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Must be exactly two ASCII letters
/// - Returned uppercased
pub fn normalize_country_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::required("code"));
    }

    if code.len() != COUNTRY_CODE_LEN || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must be exactly 2 letters".to_string(),
        });
    }

    Ok(code.to_ascii_uppercase())
}

/// Validates a country name and returns it trimmed.
pub fn validate_country_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > MAX_COUNTRY_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_COUNTRY_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Rejects NaN and infinities.
pub fn validate_finite(field: &str, value: f64) -> ValidationResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite {
            field: field.to_string(),
        })
    }
}

/// Parses a rule type spelling (`percentage` or `fixed`).
pub fn parse_rule_type(value: &str) -> ValidationResult<RuleType> {
    value.parse()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

// =============================================================================
// Countries
// =============================================================================

/// Validates a country creation body.
pub fn prepare_new_country(input: NewCountry) -> ValidationResult<CountryDraft> {
    let name = validate_country_name(input.name.as_deref().unwrap_or_default())?;
    let code = normalize_country_code(input.code.as_deref().unwrap_or_default())?;

    Ok(CountryDraft {
        name,
        code,
        active: input.active.unwrap_or(true),
    })
}

/// Validates a country update body.
///
/// Empty `name` and `code` are treated as absent.
pub fn prepare_country_update(input: CountryUpdate) -> ValidationResult<CountryChanges> {
    let name = match non_empty(input.name) {
        Some(name) => Some(validate_country_name(&name)?),
        None => None,
    };
    let code = match non_empty(input.code) {
        Some(code) => Some(normalize_country_code(&code)?),
        None => None,
    };

    Ok(CountryChanges {
        name,
        code,
        active: input.active,
    })
}

// =============================================================================
// Price Rules
// =============================================================================

/// Validates a price rule creation body and fills in defaults.
///
/// Country existence is checked by the store, not here.
pub fn prepare_new_rule(input: NewPriceRule) -> ValidationResult<PriceRuleDraft> {
    let country_id = input.country_id.ok_or(ValidationError::InvalidCountryId)?;

    let rule_type = match input.rule_type.as_deref() {
        Some(t) => parse_rule_type(t)?,
        None => return Err(ValidationError::required("type")),
    };

    let value = match input.value {
        Some(v) => validate_finite("value", v)?,
        None => return Err(ValidationError::required("value")),
    };

    let min_order_value = match input.min_order_value {
        Some(v) => validate_finite("minOrderValue", v)?,
        None => 0.0,
    };

    Ok(PriceRuleDraft {
        country_id,
        rule_type,
        value,
        product_category: non_empty(input.product_category)
            .unwrap_or_else(|| ALL_CATEGORIES.to_string()),
        product_id: non_empty(input.product_id),
        min_order_value,
        active: input.active.unwrap_or(true),
        description: Some(input.description.unwrap_or_default()),
        priority: input.priority.unwrap_or(0),
    })
}

/// Validates a price rule update body.
///
/// An empty `type` or `productCategory` is ignored. An empty `productId`
/// clears the product scope, the same as `null`.
pub fn prepare_rule_update(input: PriceRuleUpdate) -> ValidationResult<PriceRuleChanges> {
    let rule_type = match non_empty(input.rule_type) {
        Some(t) => Some(parse_rule_type(&t)?),
        None => None,
    };

    let value = input
        .value
        .map(|v| validate_finite("value", v))
        .transpose()?;

    let min_order_value = input
        .min_order_value
        .map(|v| validate_finite("minOrderValue", v))
        .transpose()?;

    Ok(PriceRuleChanges {
        country_id: input.country_id,
        rule_type,
        value,
        product_category: non_empty(input.product_category),
        product_id: input.product_id.map(non_empty),
        min_order_value,
        active: input.active,
        description: input.description,
        priority: input.priority,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
