use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now(),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message),
            timestamp: Utc::now(),
        }
    }
}

/// Standard error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_code: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", format!("{} not found", resource.into()))
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_code, self.message)
    }
}

impl From<crate::utils::Error> for ErrorResponse {
    fn from(err: crate::utils::Error) -> Self {
        match err {
            crate::utils::Error::Validation { field, message } => Self::new(
                "VALIDATION_ERROR",
                format!("Validation failed for '{field}': {message}"),
            ),
            crate::utils::Error::NotFound { resource } => {
                Self::new("NOT_FOUND", format!("{resource} not found"))
            }
            crate::utils::Error::DocumentProcessing { message } => {
                Self::new("DOCUMENT_PROCESSING_ERROR", message)
            }
            crate::utils::Error::Storage { message } => Self::new("STORAGE_ERROR", message),
            crate::utils::Error::LlmApi { message } => Self::new("LLM_API_ERROR", message),
            _ => Self::new("INTERNAL_SERVER_ERROR", "An internal server error occurred"),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.error_code.as_str() {
            "VALIDATION_ERROR" | "DOCUMENT_PROCESSING_ERROR" => StatusCode::BAD_REQUEST,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

/// Standard API result type for Axum handlers
pub type ApiResult<T> = Result<T, ErrorResponse>;

/// Convenience functions for creating common responses
pub fn validation_error(field: &str, message: &str) -> ErrorResponse {
    ErrorResponse::new(
        "VALIDATION_ERROR",
        format!("Validation failed for '{field}': {message}"),
    )
}

pub fn internal_error(message: &str) -> ErrorResponse {
    ErrorResponse::internal_error(message)
}

pub fn not_found_error(resource: impl Into<String>) -> ErrorResponse {
    ErrorResponse::not_found(resource)
}
