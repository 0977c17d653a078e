// src/supabase/backend.rs
//! Operations the application needs from the hosted backend

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::error::BackendError;
use super::models::{AuthChange, AuthUser, Session};
use crate::auth::models::{ProfileUpdate, UserProfile};
use crate::lead_magnets::models::{LeadMagnet, LeadMagnetInsert, LeadMagnetUpdate};

/// One implementation per browser session; it owns that visitor's tokens
#[async_trait]
pub trait Backend: Send + Sync {
    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError>;

    /// Returns `None` when the provider requires email confirmation first
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: Option<&str>,
    ) -> Result<Option<Session>, BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;

    async fn get_session(&self) -> Result<Option<Session>, BackendError>;

    async fn get_user(&self) -> Result<AuthUser, BackendError>;

    async fn exchange_code_for_session(&self, code: &str) -> Result<Session, BackendError>;

    fn on_auth_state_change(&self) -> broadcast::Receiver<AuthChange>;

    // ------------------------------------------------------------------
    // Data
    // ------------------------------------------------------------------

    /// `Ok(None)` when the profile row does not exist yet
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, BackendError>;

    async fn update_profile(
        &self,
        user_id: &str,
        updates: &ProfileUpdate,
    ) -> Result<UserProfile, BackendError>;

    /// Every row visible to the caller, newest first
    async fn list_lead_magnets(&self) -> Result<Vec<LeadMagnet>, BackendError>;

    async fn insert_lead_magnet(&self, row: &LeadMagnetInsert) -> Result<LeadMagnet, BackendError>;

    async fn update_lead_magnet(
        &self,
        id: &str,
        updates: &LeadMagnetUpdate,
    ) -> Result<LeadMagnet, BackendError>;

    async fn delete_lead_magnet(&self, id: &str) -> Result<(), BackendError>;

    async fn test_connection(&self) -> Result<(), BackendError>;
}
