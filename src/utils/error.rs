use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

/// Error kinds surfaced by the HTTP API. Every variant renders as a JSON body
/// `{ "success": false, "message": ... }`.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed input (400)
    Validation(String),
    /// Requested record does not exist (404)
    NotFound(String),
    /// Unique constraint violated (409)
    Duplicate(String),
    /// Missing/invalid token or bad credentials (401)
    AuthFailure(String),
    /// Store or hashing failure; detail is logged, never returned (500)
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not-found",
            AppError::Duplicate(_) => "duplicate",
            AppError::AuthFailure(_) => "auth-failure",
            AppError::Internal(_) => "internal",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Invalid request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Duplicate(msg) => write!(f, "Duplicate: {}", msg),
            AppError::AuthFailure(msg) => write!(f, "Authentication failed: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Duplicate(_) => StatusCode::CONFLICT,
            AppError::AuthFailure(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Duplicate(msg)
            | AppError::AuthFailure(msg) => msg.clone(),
            AppError::Internal(detail) => {
                log::error!("❌ Internal error: {}", detail);
                "Internal Server Error".to_string()
            }
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.kind(),
            "message": message
        }))
    }
}
