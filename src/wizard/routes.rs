// src/wizard/routes.rs

use axum::{
    routing::{post, put},
    Router,
};

use super::handlers;

/// Creates and returns the create-wizard router
///
/// # Routes
/// - `POST /api/create/type` - Step one: choose the lead magnet type
/// - `PUT /api/create/fields` - Step two: edit details
/// - `POST /api/create/back` - Return to step one
/// - `POST /api/create/generate` - Generate and navigate to the preview
pub fn wizard_routes() -> Router {
    Router::new()
        .route("/api/create/type", post(handlers::select_type))
        .route("/api/create/fields", put(handlers::update_fields))
        .route("/api/create/back", post(handlers::back))
        .route("/api/create/generate", post(handlers::generate))
}
