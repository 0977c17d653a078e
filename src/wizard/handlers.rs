// src/wizard/handlers.rs

use axum::extract::Json;
use serde_json::json;
use tracing::info;

use super::models::{FieldUpdate, SelectTypeRequest};
use super::state::Wizard;
use crate::auth::CurrentSession;
use crate::common::ApiError;

fn wizard_body(wizard: &Wizard) -> serde_json::Value {
    json!({
        "step": wizard.step,
        "step_number": wizard.step.number(),
        "form": wizard.form,
        "is_generating": wizard.is_generating,
        "can_generate": wizard.can_generate(),
    })
}

/// POST /api/create/type
pub async fn select_type(
    CurrentSession { session, .. }: CurrentSession,
    Json(payload): Json<SelectTypeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    session.require_user().await?;

    let mut wizard = session.wizard.write().await;
    wizard.select_type(payload.kind);
    Ok(Json(wizard_body(&wizard)))
}

/// PUT /api/create/fields
pub async fn update_fields(
    CurrentSession { session, .. }: CurrentSession,
    Json(payload): Json<FieldUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    session.require_user().await?;

    let mut wizard = session.wizard.write().await;
    wizard.apply(payload)?;
    Ok(Json(wizard_body(&wizard)))
}

/// POST /api/create/back
pub async fn back(
    CurrentSession { session, .. }: CurrentSession,
) -> Result<Json<serde_json::Value>, ApiError> {
    session.require_user().await?;

    let mut wizard = session.wizard.write().await;
    wizard.back();
    Ok(Json(wizard_body(&wizard)))
}

/// POST /api/create/generate
///
/// Runs the configured generator and returns the navigation to `/preview`.
/// Nothing is persisted.
pub async fn generate(
    CurrentSession { state, session }: CurrentSession,
) -> Result<Json<serde_json::Value>, ApiError> {
    let auth = session.require_user().await?;

    let form = session.wizard.write().await.begin_generation()?;
    session.ui.set_is_generating(true).await;
    info!(user_id = ?auth.user_id(), kind = ?form.kind, "Generating lead magnet");

    // Finishes even if the caller disconnects, so the flags are always reset
    let generator = state.generator.clone();
    let owner = session.clone();
    let task = tokio::spawn(async move {
        let result = generator.generate(&form).await;
        owner.wizard.write().await.finish_generation();
        owner.ui.set_is_generating(false).await;
        owner.ui.set_last_generation(result.clone()).await;
        result
    });
    let result = task
        .await
        .map_err(|e| ApiError::InternalServer(format!("Generation task failed: {}", e)))?;

    info!(
        user_id = ?auth.user_id(),
        navigate_to = %result.navigate_to,
        "Lead magnet generation finished"
    );
    Ok(Json(json!(result)))
}
