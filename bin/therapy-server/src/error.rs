//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON `{"error": "..."}` body with an appropriate status code.
//!
//! Internal errors (database, unclassified provider failures) are logged
//! with full detail but only a generic message is returned to the caller.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use therapy_core::CompletionError;
use thiserror::Error;
use tracing::{error, warn};

/// All errors that can occur in the therapy-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Propagated from the chat-completion provider.
    #[error("completion error: {0}")]
    Completion(#[from] CompletionError),

    /// Propagated from the SQLite store.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The caller referenced a resource that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),

            ServerError::Completion(e) => match e {
                CompletionError::RateLimited(detail) => {
                    warn!(detail = %detail, "completion provider rate limit");
                    (
                        StatusCode::TOO_MANY_REQUESTS,
                        "Groq API rate limit exceeded. Please wait a moment and try again.".to_owned(),
                    )
                }
                CompletionError::AuthFailed(detail) => {
                    error!(detail = %detail, "completion provider rejected credentials");
                    (
                        StatusCode::UNAUTHORIZED,
                        "Groq API authentication failed. Please check your API key.".to_owned(),
                    )
                }
                CompletionError::Provider(detail) => {
                    error!(detail = %detail, "completion provider error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "The AI patient could not respond. Please try again.".to_owned(),
                    )
                }
            },
            ServerError::Database(e) => {
                error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}
