// src/views/setup.rs
//! First-run helpers shown alongside the setup screen

use axum::extract::{Extension, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::common::{ApiError, AppState, ValidationResult};
use crate::supabase::config::is_valid_supabase_url;

#[derive(Debug, Deserialize)]
pub struct EnvSnippetRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
}

/// POST /api/setup/env
///
/// Renders the `.env` lines for the given credentials. Nothing is written.
pub async fn env_snippet(
    Json(payload): Json<EnvSnippetRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut validation = ValidationResult::new();
    validation.require("url", &payload.url, "Supabase Project URL is required");
    validation.require("anon_key", &payload.anon_key, "Supabase Anon Key is required");
    validation.into_result()?;

    let url = payload.url.trim();
    let anon_key = payload.anon_key.trim();
    Ok(Json(json!({
        "env": format!("SUPABASE_URL={}\nSUPABASE_ANON_KEY={}", url, anon_key),
        "valid_url": is_valid_supabase_url(url),
        "next_step": "Update your .env file, then restart the server.",
    })))
}

/// GET /api/setup/connection-test
pub async fn connection_test(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Json<serde_json::Value> {
    let state = state_lock.read().await.clone();

    let Some(backend) = state.new_backend() else {
        return Json(json!({
            "status": "error",
            "message": "Supabase client not configured",
        }));
    };

    match backend.test_connection().await {
        Ok(()) => {
            info!("Supabase connection test succeeded");
            Json(json!({
                "status": "success",
                "message": "Successfully connected to Supabase",
            }))
        }
        Err(e) => {
            error!(error = %e, "Supabase connection test failed");
            Json(json!({
                "status": "error",
                "message": e.to_string(),
            }))
        }
    }
}
