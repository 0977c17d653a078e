//! # Sessions Module
//!
//! One `BrowserSession` per `lm_session` cookie. It bundles the visitor's
//! backend client with the state the screens read: auth mirror, lead
//! magnet cache, create wizard and UI store.

pub mod registry;


use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::models::AuthState;
use crate::auth::sync::AuthSync;
use crate::common::ApiError;
use crate::lead_magnets::store::LeadMagnetStore;
use crate::supabase::Backend;
use crate::ui_store::UiStore;
use crate::wizard::state::Wizard;

pub use registry::SessionRegistry;

pub const SESSION_COOKIE: &str = "lm_session";

pub struct BrowserSession {
    pub id: String,
    pub backend: Arc<dyn Backend>,
    pub auth: AuthSync,
    pub lead_magnets: LeadMagnetStore,
    pub wizard: RwLock<Wizard>,
    pub ui: UiStore,
    last_seen: RwLock<DateTime<Utc>>,
}

impl BrowserSession {
    pub fn start(id: String, backend: Arc<dyn Backend>) -> Self {
        let auth = AuthSync::start(backend.clone());
        let lead_magnets = LeadMagnetStore::start(backend.clone(), auth.subscribe());
        Self {
            id,
            backend,
            auth,
            lead_magnets,
            wizard: RwLock::new(Wizard::new()),
            ui: UiStore::new(),
            last_seen: RwLock::new(Utc::now()),
        }
    }

    pub async fn touch(&self) {
        *self.last_seen.write().await = Utc::now();
    }

    pub async fn last_seen(&self) -> DateTime<Utc> {
        *self.last_seen.read().await
    }

    /// Auth state once loading has finished; signed-out visitors are rejected
    pub async fn require_user(&self) -> Result<AuthState, ApiError> {
        let auth = self.auth.wait_until(|s| !s.loading).await;
        if !auth.is_authenticated() {
            return Err(ApiError::Unauthorized("No user logged in".to_string()));
        }
        Ok(auth)
    }

    /// Stops all background synchronization; handlers still holding the
    /// session can finish, but nothing they await will publish
    pub fn teardown(&self) {
        self.auth.teardown();
        self.lead_magnets.teardown();
    }
}
