// src/views/handlers.rs
//! Route-bound screens
//!
//! Screens never block on in-flight backend work: while the auth mirror is
//! still loading they answer with a loading screen and the client polls.

use axum::{
    extract::{Json, Query, RawQuery},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

use super::screens::{
    AuthScreen, CreateScreen, DashboardScreen, HomeScreen, PreviewScreen, Screen, SetupScreen,
};
use crate::auth::models::{AuthPageQuery, AuthState};
use crate::auth::MaybeSession;
use crate::common::AppState;
use crate::sessions::BrowserSession;

/// Shared gate for screens that need a signed-in user
enum Gate {
    Show(Screen),
    Proceed(Arc<BrowserSession>, AuthState),
}

fn signed_in_gate(ctx: &MaybeSession) -> Gate {
    if !ctx.state.is_configured() {
        return Gate::Show(setup_screen(&ctx.state));
    }
    let Some(session) = &ctx.session else {
        return Gate::Show(Screen::redirect("/auth"));
    };

    let auth = session.auth.snapshot();
    if auth.loading {
        return Gate::Show(Screen::loading());
    }
    if !auth.is_authenticated() {
        return Gate::Show(Screen::redirect("/auth"));
    }
    Gate::Proceed(session.clone(), auth)
}

fn setup_screen(state: &AppState) -> Screen {
    Screen::Setup(SetupScreen::new(state.config_error.clone()))
}

/// GET /
///
/// Email links land here when the provider redirects to the site root; the
/// code is forwarded to the confirmation callback.
pub async fn home(ctx: MaybeSession, RawQuery(query): RawQuery) -> Response {
    if let Some(query) = query.filter(|q| is_callback_query(q)) {
        return Redirect::to(&format!("/auth/callback?{}", query)).into_response();
    }

    let signed_in = ctx
        .session
        .as_ref()
        .is_some_and(|s| s.auth.snapshot().is_authenticated());
    Json(Screen::Home(HomeScreen::new(signed_in))).into_response()
}

/// True when the query carries a `code` or `error` key
pub fn is_callback_query(query: &str) -> bool {
    query
        .split('&')
        .filter_map(|pair| pair.split('=').next())
        .any(|key| key == "code" || key == "error")
}

/// GET /auth
pub async fn auth_page(ctx: MaybeSession, Query(params): Query<AuthPageQuery>) -> Json<Screen> {
    if !ctx.state.is_configured() {
        return Json(setup_screen(&ctx.state));
    }

    let (auth_error, last_event) = match &ctx.session {
        Some(session) => {
            let auth = session.auth.snapshot();
            if auth.loading {
                return Json(Screen::loading());
            }
            if auth.is_authenticated() {
                return Json(Screen::redirect("/dashboard"));
            }
            (auth.error, auth.last_event)
        }
        None => (None, None),
    };

    let error = params.error.filter(|e| !e.is_empty()).or(auth_error);
    Json(Screen::Auth(AuthScreen::new(error, last_event)))
}

/// GET /dashboard
pub async fn dashboard(ctx: MaybeSession) -> Json<Screen> {
    let (session, auth) = match signed_in_gate(&ctx) {
        Gate::Show(screen) => return Json(screen),
        Gate::Proceed(session, auth) => (session, auth),
    };

    let list = session.lead_magnets.snapshot();
    let current = session.ui.snapshot().await.current_lead_magnet;
    debug!(
        user_id = ?auth.user_id(),
        total = list.items.len(),
        "Rendering dashboard"
    );
    Json(Screen::Dashboard(DashboardScreen::new(&auth, &list, current)))
}

/// GET /create
pub async fn create(ctx: MaybeSession) -> Json<Screen> {
    let session = match signed_in_gate(&ctx) {
        Gate::Show(screen) => return Json(screen),
        Gate::Proceed(session, _) => session,
    };

    let wizard = session.wizard.read().await;
    Json(Screen::Create(CreateScreen::new(&wizard)))
}

/// GET /preview
pub async fn preview(ctx: MaybeSession) -> Json<Screen> {
    let session = match signed_in_gate(&ctx) {
        Gate::Show(screen) => return Json(screen),
        Gate::Proceed(session, _) => session,
    };

    match session.ui.snapshot().await.last_generation {
        Some(result) => Json(Screen::Preview(PreviewScreen::new(result))),
        None => Json(Screen::redirect("/create")),
    }
}

/// GET /library
pub async fn library(ctx: MaybeSession) -> Json<Screen> {
    match signed_in_gate(&ctx) {
        Gate::Show(screen) => Json(screen),
        Gate::Proceed(..) => Json(Screen::not_implemented("My Lead Magnets")),
    }
}

/// GET /analytics
pub async fn analytics(ctx: MaybeSession) -> Json<Screen> {
    match signed_in_gate(&ctx) {
        Gate::Show(screen) => Json(screen),
        Gate::Proceed(..) => Json(Screen::not_implemented("Analytics")),
    }
}
