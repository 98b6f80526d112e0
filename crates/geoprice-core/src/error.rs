//! # Error Types
//!
//! Domain-specific error types for geoprice-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  geoprice-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  geoprice-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  HTTP errors (apps/api)                                                │
//! │  └── ApiError         - What the admin UI / storefront sees            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → JSON body    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The resolver itself never fails: "no rule matched" is a normal outcome.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No country with this code exists.
    #[error("Country not found: {0}")]
    CountryNotFound(String),

    /// No price rule with this id exists.
    #[error("Price rule not found: {0}")]
    PriceRuleNotFound(i64),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These surface as HTTP 400 responses.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., a three-letter country code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Numeric value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// A price rule names no country, or one that does not exist.
    #[error("Invalid country ID")]
    InvalidCountryId,

    /// Duplicate value (e.g., duplicate country code).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Creates a Required error for a field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::CountryNotFound("XX".to_string());
        assert_eq!(err.to_string(), "Country not found: XX");

        let err = CoreError::PriceRuleNotFound(42);
        assert_eq!(err.to_string(), "Price rule not found: 42");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("countryCode");
        assert_eq!(err.to_string(), "countryCode is required");

        let err = ValidationError::Duplicate {
            field: "code".to_string(),
            value: "US".to_string(),
        };
        assert_eq!(err.to_string(), "code 'US' already exists");

        assert_eq!(ValidationError::InvalidCountryId.to_string(), "Invalid country ID");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("name").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
