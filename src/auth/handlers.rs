//! Authentication handlers

use axum::{
    extract::{Json, Query},
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::extractors::{
    clear_session_cookie, request_origin, session_cookie, CurrentSession, MaybeSession,
};
use super::models::{AuthCallbackQuery, AuthState, ProfileUpdate};
use super::validators::{CredentialsValidator, ProfileUpdateValidator};
use crate::common::{safe_email_log, ApiError, AppState, Validator};
use crate::sessions::BrowserSession;
use crate::supabase::{BackendError, Credentials};

type CookieResponse = ([(axum::http::HeaderName, String); 1], Json<serde_json::Value>);

/// Reuses the caller's browser session or opens a new one
async fn open_session(
    state: &AppState,
    existing: Option<Arc<BrowserSession>>,
) -> Result<(Arc<BrowserSession>, bool), ApiError> {
    if let Some(session) = existing {
        return Ok((session, false));
    }
    let backend = state
        .new_backend()
        .ok_or_else(|| ApiError::NotConfigured("Supabase not configured".to_string()))?;
    Ok((state.sessions.create(backend).await, true))
}

fn auth_body(auth: &AuthState) -> serde_json::Value {
    json!({
        "user": auth.user,
        "profile": auth.profile,
        "is_authenticated": auth.is_authenticated(),
    })
}

/// POST /api/auth/sign-in
///
/// # Request Body
/// ```json
/// { "email": "user@example.com", "password": "secret" }
/// ```
///
/// Responds once the mirrored auth state reflects the new user, and sets
/// the `lm_session` cookie.
pub async fn sign_in(
    MaybeSession { state, session }: MaybeSession,
    Json(payload): Json<Credentials>,
) -> Result<CookieResponse, ApiError> {
    let validation = CredentialsValidator::sign_in().validate(&payload);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let (session, created) = open_session(&state, session).await?;
    info!(
        email = %safe_email_log(&payload.email),
        session_id = %session.id,
        "Sign-in attempt"
    );

    let signed_in = match session
        .backend
        .sign_in_with_password(payload.email.trim(), &payload.password)
        .await
    {
        Ok(signed_in) => signed_in,
        Err(e) => {
            warn!(error = %e, email = %safe_email_log(&payload.email), "Sign-in failed");
            if created {
                state.sessions.remove(&session.id).await;
            }
            return Err(e.into());
        }
    };

    let user_id = signed_in.user.id.clone();
    let auth = session
        .auth
        .wait_until(|s| !s.loading && s.user_id() == Some(user_id.as_str()))
        .await;

    info!(user_id = %user_id, "User signed in");
    Ok((
        [(SET_COOKIE, session_cookie(&session.id, state.secure_cookies))],
        Json(auth_body(&auth)),
    ))
}

/// POST /api/auth/sign-up
///
/// The provider sends a confirmation email linking back to `/auth/callback`.
/// When email confirmation is disabled the response already carries a user.
pub async fn sign_up(
    MaybeSession { state, session }: MaybeSession,
    headers: HeaderMap,
    Json(payload): Json<Credentials>,
) -> Result<CookieResponse, ApiError> {
    let validation = CredentialsValidator::sign_up().validate(&payload);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let (session, created) = open_session(&state, session).await?;
    let redirect_to = request_origin(&headers).map(|origin| format!("{}/auth/callback", origin));

    let result = session
        .backend
        .sign_up(payload.email.trim(), &payload.password, redirect_to.as_deref())
        .await;

    let signed_up = match result {
        Ok(signed_up) => signed_up,
        Err(e) => {
            warn!(error = %e, email = %safe_email_log(&payload.email), "Sign-up failed");
            if created {
                state.sessions.remove(&session.id).await;
            }
            return Err(e.into());
        }
    };

    let body = match signed_up {
        Some(signed_in) => {
            let user_id = signed_in.user.id.clone();
            let auth = session
                .auth
                .wait_until(|s| !s.loading && s.user_id() == Some(user_id.as_str()))
                .await;
            info!(user_id = %user_id, "User signed up and signed in");
            auth_body(&auth)
        }
        None => json!({
            "user": null,
            "profile": null,
            "is_authenticated": false,
            "message": "Check your email to confirm your account",
        }),
    };

    Ok((
        [(SET_COOKIE, session_cookie(&session.id, state.secure_cookies))],
        Json(body),
    ))
}

/// POST /api/auth/sign-out
///
/// Ends the provider session and discards the browser session. Signing out
/// while signed out is reported as an error and keeps the browser session.
/// A failed provider call still discards it, since the local tokens are gone.
pub async fn sign_out(
    CurrentSession { state, session }: CurrentSession,
) -> Result<CookieResponse, ApiError> {
    let user_id = session.auth.snapshot().user_id().map(str::to_owned);

    if let Err(e) = session.auth.sign_out().await {
        // Only an already signed-out visitor keeps the browser session; any
        // other failure happens after the provider client dropped its tokens
        if !matches!(e, BackendError::NotAuthenticated) {
            state.sessions.remove(&session.id).await;
        }
        return Err(e.into());
    }
    state.sessions.remove(&session.id).await;

    info!(
        user_id = %user_id.as_deref().unwrap_or("unknown"),
        "User signed out"
    );
    Ok((
        [(SET_COOKIE, clear_session_cookie(state.secure_cookies))],
        Json(json!({ "success": true })),
    ))
}

/// GET /api/me
///
/// The user record is read from the provider, not from the mirrored state.
pub async fn me_handler(
    CurrentSession { session, .. }: CurrentSession,
) -> Result<Json<serde_json::Value>, ApiError> {
    let auth = session.require_user().await?;
    let user = session.backend.get_user().await?;

    debug!(user_id = %user.id, "Current user requested");
    Ok(Json(json!({
        "user": user,
        "profile": auth.profile,
        "email": auth.email(),
    })))
}

/// PUT /api/profile
pub async fn update_profile(
    CurrentSession { session, .. }: CurrentSession,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let validation = ProfileUpdateValidator.validate(&payload);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    session.auth.wait_until(|s| !s.loading).await;
    let profile = session.auth.update_profile(&payload).await?;

    info!(user_id = %profile.id, "Profile updated");
    Ok(Json(json!({ "profile": profile })))
}

/// GET /auth/callback
///
/// Landing point of the confirmation email. A provider error or a failed
/// exchange goes back to `/auth?error=...`.
pub async fn auth_callback(
    MaybeSession { state, session }: MaybeSession,
    Query(params): Query<AuthCallbackQuery>,
) -> Result<Response, ApiError> {
    if let Some(err) = params.error {
        let message = params.error_description.unwrap_or(err);
        warn!(oauth_error = %message, "Auth callback returned error");
        return Ok(auth_error_redirect(&message).into_response());
    }

    let Some(code) = params.code else {
        return Err(ApiError::BadRequest(
            "No authorization code provided".to_string(),
        ));
    };

    let (session, created) = open_session(&state, session).await?;
    match session.backend.exchange_code_for_session(&code).await {
        Ok(confirmed) => {
            info!(user_id = %confirmed.user.id, "Email confirmed, session established");
            Ok((
                [(SET_COOKIE, session_cookie(&session.id, state.secure_cookies))],
                Redirect::to("/dashboard"),
            )
                .into_response())
        }
        Err(e) => {
            error!(error = %e, "Error exchanging code for session");
            let message = match &e {
                BackendError::MissingCodeVerifier => {
                    "Open the confirmation link in the browser you signed up with".to_string()
                }
                other => other.to_string(),
            };
            if created {
                state.sessions.remove(&session.id).await;
            }
            Ok(auth_error_redirect(&message).into_response())
        }
    }
}

fn auth_error_redirect(message: &str) -> Redirect {
    Redirect::to(&format!("/auth?error={}", urlencoding::encode(message)))
}
