use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use gatehouse_core::AuthError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`AuthError`] for domain errors and implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `gatehouse_core`.
    #[error(transparent)]
    Core(#[from] AuthError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                // Input errors: the request never reached the store.
                AuthError::EmptyUserId | AuthError::InvalidUserId | AuthError::InvalidToken => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    core.to_string(),
                ),

                // Authentication errors: rejected, never explained further
                // than the broad category.
                AuthError::TokenExpired => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "token is expired".to_string(),
                ),
                AuthError::SessionNotFound | AuthError::InvalidSession => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "refresh session is invalid".to_string(),
                ),

                // Infrastructure errors: opaque to the caller, logged here.
                AuthError::UserNotFound
                | AuthError::TokenCreation(_)
                | AuthError::Hashing(_)
                | AuthError::Store(_) => {
                    tracing::error!(error = %core, "internal auth error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
