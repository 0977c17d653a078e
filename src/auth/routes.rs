//! Authentication routes

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/auth/sign-in` - Email and password sign-in
/// - `POST /api/auth/sign-up` - Account creation, usually pending email confirmation
/// - `POST /api/auth/sign-out` - Ends the provider session and the browser session
/// - `GET /api/me` - Current user and profile
/// - `PUT /api/profile` - Partial update of the caller's profile row
/// - `GET /auth/callback` - Email confirmation landing point
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/sign-in", post(handlers::sign_in))
        .route("/api/auth/sign-up", post(handlers::sign_up))
        .route("/api/auth/sign-out", post(handlers::sign_out))
        .route("/api/me", get(handlers::me_handler))
        .route("/api/profile", put(handlers::update_profile))
        .route("/auth/callback", get(handlers::auth_callback))
}
