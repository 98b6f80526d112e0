//! # geoprice-core: Pure Pricing Logic for GeoPrice
//!
//! This crate is the **heart** of GeoPrice. It decides which country price
//! rule applies to a product and what the visitor pays, as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        GeoPrice Architecture                            │
//! │                                                                         │
//! │  ┌──────────────────────────┐        ┌──────────────────────────────┐  │
//! │  │   apps/api (axum)        │        │   geoprice-agent             │  │
//! │  │   POST /prices/calculate │        │   storefront price rewrite   │  │
//! │  └────────────┬─────────────┘        └──────────────┬───────────────┘  │
//! │               │                                     │                   │
//! │  ┌────────────▼─────────────────────────────────────▼───────────────┐  │
//! │  │               ★ geoprice-core (THIS CRATE) ★                      │  │
//! │  │                                                                   │  │
//! │  │   ┌───────────┐  ┌───────────┐  ┌─────────────┐  ┌────────────┐  │  │
//! │  │   │   types   │  │ resolver  │  │ calculation │  │ validation │  │  │
//! │  │   │  Country  │  │ sort+pick │  │  Calculation│  │ code, name │  │  │
//! │  │   │ PriceRule │  │  adjust   │  │  Service    │  │ rule value │  │  │
//! │  │   └───────────┘  └───────────┘  └─────────────┘  └────────────┘  │  │
//! │  │                                                                   │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS             │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Country, PriceRule, PriceContext, ...)
//! - [`resolver`] - Rule ordering, matching and price adjustment
//! - [`calculation`] - The calculation result shared by every call site
//! - [`money`] - Display formatting of prices
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use geoprice_core::resolver::resolve;
//! use geoprice_core::types::{PriceContext, PriceRule, RuleType};
//!
//! let rule = PriceRule::new(1, RuleType::Percentage, 5.0).with_priority(10);
//! let context = PriceContext::new(100.0);
//!
//! let resolution = resolve(&[rule], &context);
//! assert_eq!(resolution.adjusted_price, 105.0);
//! assert!(resolution.applied_rule.is_some());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculation;
pub mod error;
pub mod money;
pub mod resolver;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculation::{calculate, PriceCalculation};
pub use error::{CoreError, CoreResult, ValidationError};
pub use resolver::{resolve, Resolution};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Category sentinel meaning "matches every product category".
pub const ALL_CATEGORIES: &str = "all";

/// Number of letters in a country code (ISO 3166-1 alpha-2).
pub const COUNTRY_CODE_LEN: usize = 2;
