// Authentication error types and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// Error taxonomy for the authentication lifecycle
///
/// Every variant is terminal for the current request and maps to a fixed
/// status code and client-facing message. Internal details carried by the
/// 500-class variants are logged, never sent to the client.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Registration conflict
    #[error("User already exists")]
    AlreadyExists,

    /// Login failure; deliberately does not say which factor was wrong
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No usable bearer token was presented
    #[error("Access Denied")]
    Unauthorized,

    /// A token was presented but failed signature, structure or expiry checks
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Request body was malformed or failed field validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Password hashing error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Credential store error: {0}")]
    StorageError(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::AlreadyExists => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::BAD_REQUEST,
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::PasswordHashError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that is safe to send to clients (no sensitive data)
    pub fn error_message(&self) -> String {
        match self {
            AuthError::ValidationError(msg) => msg.clone(),
            AuthError::PasswordHashError(_)
            | AuthError::TokenGenerationError(_)
            | AuthError::StorageError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::Unauthorized => warn!("Request without bearer token rejected"),
            AuthError::InvalidToken => warn!("Invalid token attempt"),
            AuthError::PasswordHashError(detail)
            | AuthError::TokenGenerationError(detail)
            | AuthError::StorageError(detail) => error!("Internal auth failure: {}", detail),
            _ => {}
        }

        let body = Json(json!({
            "message": self.error_message(),
        }));

        (self.status_code(), body).into_response()
    }
}
