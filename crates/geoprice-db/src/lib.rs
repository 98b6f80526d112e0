//! # geoprice-db: Database Layer for GeoPrice
//!
//! This crate provides database access for GeoPrice.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        GeoPrice Data Flow                               │
//! │                                                                         │
//! │  axum handler (POST /api/prices/calculate)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   geoprice-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ CountryRepo   │    │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │◄───│ PriceRuleRepo │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                        ┌───────▼────────┐                      │   │
//! │  │                        │ PricingService │ → geoprice-core      │   │
//! │  │                        └────────────────┘                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Country and price rule repositories
//! - [`pricing`] - Calculation backed by the store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use geoprice_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./geoprice.db")).await?;
//!
//! let countries = db.countries().list_active().await?;
//! let result = db.pricing().calculate("TR", &context).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod pricing;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use pricing::PricingService;

// Repository re-exports for convenience
pub use repository::country::CountryRepository;
pub use repository::price_rule::PriceRuleRepository;
