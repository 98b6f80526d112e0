//! # GeoPrice API
//!
//! axum server for country-specific price rules.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           API Server                                    │
//! │                                                                         │
//! │  Admin UI ─────┐                                                        │
//! │                ├──► /api (axum) ──► routes ──► geoprice-db ──► SQLite   │
//! │  Storefront ───┘      │                           │                     │
//! │  agent            CorsLayer               geoprice-core::resolver       │
//! │                   TraceLayer                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ApiConfig`]. Environment variables:
//! - `GEOPRICE_CONFIG` - path to a TOML config file
//! - `GEOPRICE_BIND_ADDR` - interface (default: 0.0.0.0)
//! - `GEOPRICE_PORT` - HTTP port (default: 5000)
//! - `GEOPRICE_DATABASE_PATH` - SQLite file (default: ./geoprice.db)
//! - `GEOPRICE_MAX_CONNECTIONS` - pool size (default: 5)
//! - `GEOPRICE_CORS_ORIGIN` - allowed origin (default: any)

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

/// Builds the full application router.
pub fn app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .nest("/api", routes::api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for an optional single allowed origin.
///
/// `None` allows any origin; the storefront agent runs on shop domains
/// the server does not know in advance.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, ConfigError> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match origin {
        None => Ok(layer.allow_origin(Any)),
        Some(origin) => {
            let value = HeaderValue::from_str(origin)
                .map_err(|_| ConfigError::Invalid(format!("bad CORS origin: {}", origin)))?;
            Ok(layer.allow_origin(value))
        }
    }
}
