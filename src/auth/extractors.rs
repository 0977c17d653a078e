//! Browser session extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{
        header::{COOKIE, HOST, ORIGIN},
        request::Parts,
        HeaderMap,
    },
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::common::{ApiError, AppState};
use crate::sessions::{BrowserSession, SESSION_COOKIE};

/// App state plus the caller's browser session, if the cookie names a live one
pub struct MaybeSession {
    pub state: AppState,
    pub session: Option<Arc<BrowserSession>>,
}

/// Like `MaybeSession`, but rejects requests without a live browser session
///
/// The visitor may still be signed out; handlers check `auth` themselves.
pub struct CurrentSession {
    pub state: AppState,
    pub session: Arc<BrowserSession>,
}

async fn app_state<S: Send + Sync>(parts: &mut Parts, state: &S) -> Result<AppState, ApiError> {
    let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
        Extension::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

    let app_state = state_lock.read().await.clone();
    Ok(app_state)
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = app_state(parts, state).await?;

        let session = match cookie_value(&parts.headers, SESSION_COOKIE) {
            Some(id) => {
                let found = app_state.sessions.get(&id).await;
                if found.is_none() {
                    debug!(session_id = %id, "Unknown or expired browser session cookie");
                }
                found
            }
            None => None,
        };

        Ok(MaybeSession {
            state: app_state,
            session,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let MaybeSession { state, session } = MaybeSession::from_request_parts(parts, state).await?;

        if !state.is_configured() {
            return Err(ApiError::NotConfigured(
                "Supabase not configured".to_string(),
            ));
        }

        match session {
            Some(session) => Ok(CurrentSession { state, session }),
            None => Err(ApiError::Unauthorized("No user logged in".to_string())),
        }
    }
}

// ============================================================================
// Cookie Helpers
// ============================================================================

/// Reads one cookie from every `Cookie` header on the request
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(id: &str, secure: bool) -> String {
    let mut cookie = format!("{}={}; HttpOnly; SameSite=Lax; Path=/", SESSION_COOKIE, id);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Origin the browser used to reach us, for links the provider sends back
pub fn request_origin(headers: &HeaderMap) -> Option<String> {
    if let Some(origin) = headers.get(ORIGIN).and_then(|h| h.to_str().ok()) {
        return Some(origin.trim_end_matches('/').to_string());
    }
    headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .map(|host| format!("http://{}", host))
}
