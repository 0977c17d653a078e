// src/main.rs
use axum::{extract::Extension, middleware, Router};
use dotenv::dotenv;
use reqwest::Client;
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod lead_magnets;
mod logging_middleware;
mod sessions;
mod supabase;
mod ui_store;
mod views;
mod wizard;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use common::{AppConfig, AppState, BackendFactory};
use sessions::SessionRegistry;
use supabase::{Backend, SupabaseClient};
use wizard::SimulatedGenerator;

// ============================================================================
// ROUTER COMPOSITION
// ============================================================================

pub fn app(shared: Arc<RwLock<AppState>>, cors_origins: &[String]) -> Router {
    Router::new()
        // ====================================================================
        // SCREENS AND SETUP HELPERS
        // ====================================================================
        .merge(views::view_routes())
        // ====================================================================
        // AUTHENTICATION ROUTES (Sign-in, Sign-up, Callback, Profile)
        // ====================================================================
        .merge(auth::auth_routes())
        // ====================================================================
        // LEAD MAGNET ROUTES (List, Create, Update, Delete, UI selection)
        // ====================================================================
        .merge(lead_magnets::lead_magnet_routes())
        // ====================================================================
        // CREATE WIZARD ROUTES
        // ====================================================================
        .merge(wizard::wizard_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        // Add request/response body logging in debug mode
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(shared))
        .layer({
            let origins: Vec<axum::http::HeaderValue> = cors_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::HeaderName::from_static("x-request-id"),
                ])
                .allow_credentials(true)
        })
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = AppConfig::from_env();
    info!(
        port = config.port,
        cors_origins = ?config.cors_origins,
        simulated_generation_ms = config.simulated_generation.as_millis() as u64,
        session_idle_secs = config.session_idle.as_secs(),
        "Configuration loaded"
    );

    // ========================================================================
    // BACKEND CLIENT SETUP
    // ========================================================================

    let http_client = Client::builder().no_proxy().build()?;

    let (backend_factory, config_error): (Option<BackendFactory>, Option<String>) =
        match config.supabase.clone() {
            Ok(supabase_config) => {
                info!(url = %supabase_config.base_url(), "Supabase configured");
                let factory: BackendFactory = Arc::new(move || {
                    Arc::new(SupabaseClient::new(
                        http_client.clone(),
                        supabase_config.clone(),
                    )) as Arc<dyn Backend>
                });
                (Some(factory), None)
            }
            Err(e) => {
                warn!(error = %e, "Supabase not configured, serving setup screens");
                (None, Some(e.to_string()))
            }
        };

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let sessions = SessionRegistry::new();
    SessionRegistry::start_reaper_task(sessions.clone(), config.session_idle);
    info!("Session reaper task started");

    let app_state = AppState {
        backend_factory,
        config_error,
        sessions,
        generator: Arc::new(SimulatedGenerator::new(config.simulated_generation)),
        secure_cookies: config.secure_cookies,
    };

    let shared = Arc::new(RwLock::new(app_state));
    let app = app(shared, &config.cors_origins);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
