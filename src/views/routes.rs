// src/views/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::{handlers, setup};

/// Creates and returns the screen router
///
/// # Routes
/// - `GET /` - Home
/// - `GET /auth` - Sign-in and sign-up
/// - `GET /dashboard` - Stats, actions and recent lead magnets
/// - `GET /create` - Create wizard
/// - `GET /preview` - Last generation result
/// - `GET /library`, `GET /analytics` - Not implemented yet
/// - `POST /api/setup/env` - Render `.env` lines
/// - `GET /api/setup/connection-test` - Probe the configured backend
pub fn view_routes() -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/auth", get(handlers::auth_page))
        .route("/dashboard", get(handlers::dashboard))
        .route("/create", get(handlers::create))
        .route("/preview", get(handlers::preview))
        .route("/library", get(handlers::library))
        .route("/analytics", get(handlers::analytics))
        .route("/api/setup/env", post(setup::env_snippet))
        .route("/api/setup/connection-test", get(setup::connection_test))
}
