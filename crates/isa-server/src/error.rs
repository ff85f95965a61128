//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use isa_batch::{RejectionError, SubmitError, ValidationError};
use isa_store::StoreError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// No signed-in user, or no access credential outside simulation.
    #[error("login required")]
    LoginRequired,

    /// Request body or query could not be read.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Batch rejected before any remote call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No edit of the batch was confirmed.
    #[error("no edit was confirmed")]
    Failure,

    /// Nothing found for the query.
    #[error("not found: {0}")]
    NotFound(String),

    /// Suggestion rejection refused.
    #[error(transparent)]
    Rejection(#[from] RejectionError),

    /// Store read failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Batch worker failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<SubmitError> for ServerError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(e) => Self::Validation(e),
            SubmitError::NothingConfirmed { .. } => Self::Failure,
            SubmitError::Worker(message) => Self::Internal(message),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::LoginRequired => (StatusCode::UNAUTHORIZED, json!({"error": "login required"})),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({"error": message})),
            Self::Validation(e) => (StatusCode::BAD_REQUEST, json!({"error": e.to_string()})),
            Self::Failure => return (StatusCode::BAD_REQUEST, "Failure").into_response(),
            Self::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({"error": "not found", "detail": what}),
            ),
            Self::Rejection(RejectionError::Store(e)) | Self::Store(e) => {
                tracing::error!(error = %e, "Store request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "store error"}),
                )
            }
            Self::Rejection(e) => (StatusCode::BAD_REQUEST, json!({"error": e.to_string()})),
            Self::Internal(message) => {
                tracing::error!(error = %message, "Batch worker failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "internal error"}),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
