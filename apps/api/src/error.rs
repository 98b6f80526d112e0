//! # API Error Type
//!
//! Unified error type for route handlers.
//!
//! ## Error Flow
//! ```text
//! ValidationError ──► CoreError ──► DbError ──► ApiError ──► HTTP response
//!
//!   DbError::NotFound              404  NOT_FOUND
//!   DbError::Validation / dup / FK 400  VALIDATION_ERROR
//!   other DbError                  500  DATABASE_ERROR
//!   bad JSON / query string        400  VALIDATION_ERROR
//! ```
//!
//! ## Response Body
//! ```json
//! {
//!   "code": "NOT_FOUND",
//!   "message": "Country not found: 42"
//! }
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use geoprice_core::{CoreError, ValidationError};
use geoprice_db::DbError;

/// Error returned from route handlers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            err if err.is_validation() => ApiError::validation(err.to_string()),
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            err => {
                tracing::error!(error = %err, "Database operation failed");
                ApiError::new(ErrorCode::DatabaseError, err.to_string())
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::from(DbError::from(err))
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_mapping() {
        let err = ApiError::from(DbError::not_found("Country", 42));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Country not found: 42");

        let err = ApiError::from(DbError::invalid_country());
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Invalid country ID");

        let err = ApiError::from(DbError::duplicate("code", "TR"));
        assert_eq!(err.code.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(DbError::QueryFailed("disk I/O error".into()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.code.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_core_not_found_is_404() {
        let err = ApiError::from(CoreError::CountryNotFound("ZZ".into()));
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::validation("code is required")).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "code is required");
    }
}
