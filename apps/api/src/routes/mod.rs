//! # HTTP Routes
//!
//! ```text
//! /api
//! ├── /health          health, health/db
//! ├── /countries       country CRUD
//! └── /prices          price rule CRUD, storefront feed, calculation
//! ```

pub mod countries;
pub mod health;
pub mod prices;

use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;

use crate::state::AppState;

/// `{message}` body returned by deletes.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

/// All routes under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/db", get(health::database_health))
        .nest("/countries", country_routes())
        .nest("/prices", price_routes())
}

fn country_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(countries::list_countries).post(countries::create_country))
        .route("/active", get(countries::list_active_countries))
        .route(
            "/{id}",
            get(countries::get_country)
                .put(countries::update_country)
                .delete(countries::delete_country),
        )
}

fn price_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(prices::list_rules).post(prices::create_rule))
        .route("/calculate", post(prices::calculate_price))
        .route("/country/{country_id}", get(prices::list_rules_for_country))
        .route("/country-code/{country_code}", get(prices::list_rules_for_country_code))
        .route(
            "/{id}",
            get(prices::get_rule)
                .put(prices::update_rule)
                .delete(prices::delete_rule),
        )
}
