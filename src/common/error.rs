// Error handling types for the API

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use super::validation::ValidationResult;
use crate::lead_magnets::store::StoreError;
use crate::supabase::BackendError;
use crate::wizard::state::WizardError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    InternalServer(String),
    NotConfigured(String),
    Backend(BackendError),
    RequestFailed(String),
    ValidationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::NotConfigured(msg) => write!(f, "Not Configured: {}", msg),
            ApiError::Backend(e) => write!(f, "Backend Error: {}", e),
            ApiError::RequestFailed(msg) => write!(f, "Request Failed: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

fn backend_status(e: &BackendError) -> (StatusCode, &'static str) {
    match e {
        BackendError::NotConfigured => (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONFIGURED"),
        BackendError::NotAuthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        BackendError::NoRows => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        BackendError::MissingCodeVerifier => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        BackendError::Http { status, .. } if (400..500).contains(status) => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST),
            "BACKEND_REJECTED",
        ),
        BackendError::Http { .. } | BackendError::Transport(_) | BackendError::Decode(_) => {
            (StatusCode::BAD_GATEWAY, "REQUEST_FAILED")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED"),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            ApiError::InternalServer(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "INTERNAL_SERVER_ERROR",
            ),
            ApiError::NotConfigured(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, msg, "NOT_CONFIGURED")
            }
            ApiError::Backend(e) => {
                let (status, code) = backend_status(&e);
                if status.is_server_error() {
                    error!(error = %e, "Backend request failed");
                }
                (status, e.to_string(), code)
            }
            ApiError::RequestFailed(msg) => (StatusCode::BAD_GATEWAY, msg, "REQUEST_FAILED"),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg, "VALIDATION_ERROR"),
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<BackendError> for ApiError {
    fn from(e: BackendError) -> Self {
        ApiError::Backend(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotAuthenticated => ApiError::Unauthorized(e.to_string()),
            StoreError::Backend(e) => ApiError::Backend(e),
        }
    }
}

impl From<WizardError> for ApiError {
    fn from(e: WizardError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

/// Helper function to convert ValidationResult to ApiError
impl From<ValidationResult> for ApiError {
    fn from(result: ValidationResult) -> Self {
        if result.is_valid() {
            ApiError::InternalServer(
                "Validation result was valid but converted to error".to_string(),
            )
        } else {
            let error_messages: Vec<String> = result
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            ApiError::ValidationError(error_messages.join(", "))
        }
    }
}
