//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Validation failures are not logged as exceptional; database failures
//! are logged in full and surfaced with a generic label plus the
//! underlying error text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Database error (500, logged)
    Database {
        context: &'static str,
        source: DbError,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "error": e.to_string()
                }),
            ),
            Self::Database { context, source } => {
                tracing::error!(context, error = %source, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "success": false,
                        "error": context,
                        "message": source.to_string()
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}
