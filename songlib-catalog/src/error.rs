//! Error types for songlib-catalog
//!
//! `CatalogError` is what catalog operations return. `ApiError` maps it onto
//! HTTP responses: validation and not-found are reported precisely, store
//! failures generically.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Catalog operation errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed input, detected before any store or network call
    #[error("Invalid input: {0}")]
    Validation(String),

    /// No song with this identifier
    #[error("Song {0} not found")]
    NotFound(i64),

    /// Any other persistence failure, propagated unchanged
    #[error(transparent)]
    Store(#[from] songlib_common::Error),
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        CatalogError::Store(songlib_common::Error::Database(err))
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Song not found (404)
    #[error("Song not found")]
    NotFound,

    /// Internal server error (500); the cause is logged, never returned
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => ApiError::BadRequest(msg),
            CatalogError::NotFound(_) => ApiError::NotFound,
            CatalogError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Song not found".to_string()),
            ApiError::Internal(detail) => {
                error!("Request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_mapping() {
        assert!(matches!(
            ApiError::from(CatalogError::Validation("Invalid limit".to_string())),
            ApiError::BadRequest(msg) if msg == "Invalid limit"
        ));
        assert!(matches!(ApiError::from(CatalogError::NotFound(7)), ApiError::NotFound));
        assert!(matches!(
            ApiError::from(CatalogError::from(sqlx::Error::PoolClosed)),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("disk full".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
