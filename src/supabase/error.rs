// src/supabase/error.rs
//! Errors raised by the hosted backend adapter

use reqwest::StatusCode;
use serde::Deserialize;

/// PostgREST code for "the single-object request matched zero rows"
pub const NO_ROWS_CODE: &str = "PGRST116";

#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    #[error("Supabase not configured")]
    NotConfigured,

    #[error("No user logged in")]
    NotAuthenticated,

    #[error("{message}")]
    Http {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Code verifier not found in storage")]
    MissingCodeVerifier,

    #[error("No rows returned")]
    NoRows,

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Union of the error bodies returned by GoTrue and PostgREST
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<serde_json::Value>,
    message: Option<String>,
    msg: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

impl BackendError {
    /// Builds an error from a non-success response body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        // GoTrue sends numeric codes, PostgREST sends strings
        let code = parsed.code.map(|c| match c {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });

        if code.as_deref() == Some(NO_ROWS_CODE) {
            return BackendError::NoRows;
        }

        let message = parsed
            .error_description
            .or(parsed.msg)
            .or(parsed.message)
            .or(parsed.error)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        BackendError::Http {
            status: status.as_u16(),
            code,
            message,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else {
            BackendError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        BackendError::Decode(e.to_string())
    }
}
