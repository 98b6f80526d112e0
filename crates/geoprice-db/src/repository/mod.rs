//! # Repository Module
//!
//! Database repository implementations for GeoPrice.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  axum handler                                                          │
//! │       │                                                                 │
//! │       │  state.db.price_rules().list(filter)                           │
//! │       ▼                                                                 │
//! │  PriceRuleRepository                                                   │
//! │  ├── list(&self, filter)                                               │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── create(&self, draft)                                              │
//! │  └── update(&self, id, changes)                                        │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CountryRepository`](country::CountryRepository) - Country CRUD and code lookup
//! - [`PriceRuleRepository`](price_rule::PriceRuleRepository) - Price rule CRUD and listings

pub mod country;
pub mod price_rule;
