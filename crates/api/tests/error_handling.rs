//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests call `IntoResponse` directly on `AppError` values and need no
//! database.

use annostore_api::error::AppError;
use annostore_core::error::CoreError;
use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;

/// Helper: convert an `AppError` into its status code and raw body.
async fn error_to_response(err: AppError) -> (StatusCode, Vec<u8>) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to a bare 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_empty_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Annotation",
        id: 42,
    });

    let (status, body) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

// ---------------------------------------------------------------------------
// Test: database errors map to 500 and sanitize the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn database_error_returns_500_and_sanitizes_message() {
    let err = AppError::Database(sqlx::Error::Protocol(
        "secret connection string leaked".into(),
    ));

    let (status, body) = error_to_response(err).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
    assert!(
        !json.to_string().contains("secret"),
        "Internal error response must not leak sensitive details"
    );
}

// ---------------------------------------------------------------------------
// Test: From conversions pick the right variant
// ---------------------------------------------------------------------------

#[test]
fn core_error_converts_into_app_error() {
    let err: AppError = CoreError::NotFound {
        entity: "Annotation",
        id: 7,
    }
    .into();
    assert_matches!(err, AppError::Core(CoreError::NotFound { id: 7, .. }));
}

#[test]
fn sqlx_error_converts_into_app_error() {
    let err: AppError = sqlx::Error::RowNotFound.into();
    assert_matches!(err, AppError::Database(sqlx::Error::RowNotFound));
}
