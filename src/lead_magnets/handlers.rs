// src/lead_magnets/handlers.rs

use axum::{
    extract::{Json, Path},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::models::{LeadMagnetUpdate, NewLeadMagnet};
use super::validators::LeadMagnetValidator;
use crate::auth::CurrentSession;
use crate::common::{ApiError, Validator};

/// GET /api/lead-magnets
pub async fn list_lead_magnets(
    CurrentSession { session, .. }: CurrentSession,
) -> Result<Json<serde_json::Value>, ApiError> {
    let auth = session.require_user().await?;
    let list = session.lead_magnets.wait_loaded().await;

    debug!(user_id = ?auth.user_id(), count = list.items.len(), "Listing lead magnets");
    Ok(Json(json!(list)))
}

/// POST /api/lead-magnets
pub async fn create_lead_magnet(
    CurrentSession { session, .. }: CurrentSession,
    Json(payload): Json<NewLeadMagnet>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let validation = LeadMagnetValidator.validate(&payload);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    session.require_user().await?;
    let created = session.lead_magnets.create(payload).await?;

    Ok((StatusCode::CREATED, Json(json!({ "lead_magnet": created }))))
}

/// PUT /api/lead-magnets/:id
pub async fn update_lead_magnet(
    CurrentSession { session, .. }: CurrentSession,
    Path(id): Path<String>,
    Json(payload): Json<LeadMagnetUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let validation = LeadMagnetValidator.validate(&payload);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let auth = session.require_user().await?;
    session.lead_magnets.wait_loaded().await;
    if session.lead_magnets.find(&id).is_none() {
        return Err(ApiError::NotFound(format!("Lead magnet {} not found", id)));
    }

    let updated = session.lead_magnets.update(&id, &payload).await?;

    let ui = session.ui.snapshot().await;
    if ui.current_lead_magnet.as_ref().is_some_and(|lm| lm.id == id) {
        session.ui.set_current_lead_magnet(Some(updated.clone())).await;
    }

    info!(user_id = ?auth.user_id(), lead_magnet_id = %id, "Lead magnet updated");
    Ok(Json(json!({ "lead_magnet": updated })))
}

/// DELETE /api/lead-magnets/:id
pub async fn delete_lead_magnet(
    CurrentSession { session, .. }: CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    session.require_user().await?;
    session.lead_magnets.wait_loaded().await;
    if session.lead_magnets.find(&id).is_none() {
        return Err(ApiError::NotFound(format!("Lead magnet {} not found", id)));
    }

    session.lead_magnets.delete(&id).await?;
    session.ui.forget_lead_magnet(&id).await;

    Ok(Json(json!({ "success": true })))
}

/// POST /api/lead-magnets/refetch
pub async fn refetch_lead_magnets(
    CurrentSession { session, .. }: CurrentSession,
) -> Result<Json<serde_json::Value>, ApiError> {
    session.require_user().await?;
    session.lead_magnets.refetch().await?;

    Ok(Json(json!(session.lead_magnets.snapshot())))
}

#[derive(Debug, Deserialize)]
pub struct SelectLeadMagnetRequest {
    pub id: Option<String>,
}

/// PUT /api/ui/current
///
/// Selects a cached lead magnet, or clears the selection with `{"id": null}`.
pub async fn select_current_lead_magnet(
    CurrentSession { session, .. }: CurrentSession,
    Json(payload): Json<SelectLeadMagnetRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    session.require_user().await?;

    let selected = match payload.id {
        Some(id) => {
            session.lead_magnets.wait_loaded().await;
            let found = session
                .lead_magnets
                .find(&id)
                .ok_or_else(|| ApiError::NotFound(format!("Lead magnet {} not found", id)))?;
            Some(found)
        }
        None => None,
    };
    session.ui.set_current_lead_magnet(selected).await;

    Ok(Json(json!(session.ui.snapshot().await)))
}
