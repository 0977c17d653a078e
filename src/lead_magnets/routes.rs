// src/lead_magnets/routes.rs

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers;

/// Creates and returns the lead magnet router
///
/// # Routes
/// - `GET /api/lead-magnets` - Cached list, newest first
/// - `POST /api/lead-magnets` - Create a lead magnet owned by the caller
/// - `PUT /api/lead-magnets/:id` - Partial update
/// - `DELETE /api/lead-magnets/:id` - Delete
/// - `POST /api/lead-magnets/refetch` - Reload the list from the backend
/// - `PUT /api/ui/current` - Select the lead magnet the UI is focused on
pub fn lead_magnet_routes() -> Router {
    Router::new()
        .route(
            "/api/lead-magnets",
            get(handlers::list_lead_magnets).post(handlers::create_lead_magnet),
        )
        .route("/api/lead-magnets/refetch", post(handlers::refetch_lead_magnets))
        .route(
            "/api/lead-magnets/:id",
            put(handlers::update_lead_magnet).delete(handlers::delete_lead_magnet),
        )
        .route("/api/ui/current", put(handlers::select_current_lead_magnet))
}
