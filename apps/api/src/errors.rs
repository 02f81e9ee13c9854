use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
///
/// The first six variants form the closed failure taxonomy of the content
/// pipeline (`Parse`, `Validation`, `Quota`, `Network`, `Server`,
/// `Application`); the rest cover the HTTP surface. Components raise the most
/// specific kind they can determine — nothing in the core auto-retries.
///
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Quota error: {0}")]
    Quota(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream server error (status {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Application error: {0}")]
    Application(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Parse(msg) => {
                tracing::warn!("Parse error: {msg}");
                (StatusCode::BAD_GATEWAY, "PARSE_ERROR", msg.clone())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Quota(msg) => (StatusCode::TOO_MANY_REQUESTS, "QUOTA_ERROR", msg.clone()),
            AppError::Network(msg) => {
                tracing::warn!("Network error: {msg}");
                (StatusCode::BAD_GATEWAY, "NETWORK_ERROR", msg.clone())
            }
            AppError::Server {
                status: upstream,
                message,
            } => {
                tracing::error!("Upstream server error (status {upstream}): {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    "SERVER_ERROR",
                    format!("Upstream server error (status {upstream}): {message}"),
                )
            }
            AppError::Application(msg) => {
                (StatusCode::BAD_GATEWAY, "APPLICATION_ERROR", msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Access denied".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
