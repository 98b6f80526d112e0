//! # Country Routes
//!
//! ```text
//! GET    /api/countries          all countries, name ascending
//! GET    /api/countries/active   active countries, name ascending
//! GET    /api/countries/{id}
//! POST   /api/countries          201 + created country
//! PUT    /api/countries/{id}     partial update
//! DELETE /api/countries/{id}     cascades to the country's rules
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::routes::MessageResponse;
use crate::state::AppState;
use geoprice_core::validation::{prepare_country_update, prepare_new_country};
use geoprice_core::{Country, CountryUpdate, NewCountry};

pub async fn list_countries(State(state): State<AppState>) -> ApiResult<Json<Vec<Country>>> {
    Ok(Json(state.db().countries().list().await?))
}

pub async fn list_active_countries(State(state): State<AppState>) -> ApiResult<Json<Vec<Country>>> {
    Ok(Json(state.db().countries().list_active().await?))
}

pub async fn get_country(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Country>> {
    let Path(id) = id?;
    state
        .db()
        .countries()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Country", &id.to_string()))
}

pub async fn create_country(
    State(state): State<AppState>,
    body: Result<Json<NewCountry>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Country>)> {
    let Json(input) = body?;
    let draft = prepare_new_country(input)?;

    let country = state.db().countries().create(&draft).await?;
    info!(id = country.id, code = %country.code, "Country created");

    Ok((StatusCode::CREATED, Json(country)))
}

pub async fn update_country(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<CountryUpdate>, JsonRejection>,
) -> ApiResult<Json<Country>> {
    let Path(id) = id?;
    let Json(input) = body?;
    let changes = prepare_country_update(input)?;

    let country = state.db().countries().update(id, &changes).await?;
    info!(id, code = %country.code, "Country updated");

    Ok(Json(country))
}

pub async fn delete_country(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;
    state.db().countries().delete(id).await?;
    info!(id, "Country deleted");

    Ok(Json(MessageResponse::new("Country deleted successfully")))
}
