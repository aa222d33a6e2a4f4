use annostore_core::error::CoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and `sqlx::Error` for storage
/// faults. Implements [`IntoResponse`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `annostore_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            // The annotator client expects a bare 404 with no body.
            AppError::Core(CoreError::NotFound { entity, id }) => {
                tracing::debug!(entity, id, "Entity not found");
                StatusCode::NOT_FOUND.into_response()
            }

            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                let body = json!({
                    "error": "An internal error occurred",
                    "code": "INTERNAL_ERROR",
                });
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
        }
    }
}
