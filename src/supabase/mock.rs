//! In-memory backend used by unit tests across the crate

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, Notify};

use super::backend::Backend;
use super::error::BackendError;
use super::models::{AuthChange, AuthEvent, AuthUser, Session};
use crate::auth::models::{ProfileUpdate, SubscriptionTier, UserProfile};
use crate::lead_magnets::models::{LeadMagnet, LeadMagnetInsert, LeadMagnetUpdate};

pub fn test_user(id: &str, email: &str) -> AuthUser {
    AuthUser {
        id: id.to_string(),
        email: Some(email.to_string()),
        email_confirmed_at: None,
        created_at: None,
        user_metadata: serde_json::Value::Null,
    }
}

pub fn test_session(id: &str, email: &str) -> Session {
    Session {
        access_token: format!("access-{}", id),
        refresh_token: format!("refresh-{}", id),
        token_type: "bearer".to_string(),
        expires_at: Utc::now().timestamp() + 3600,
        user: test_user(id, email),
    }
}

pub fn test_profile(id: &str, email: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        email: email.to_string(),
        name: None,
        created_at: "2024-01-01T00:00:00Z".to_string(),
        subscription_tier: SubscriptionTier::Free,
        stripe_customer_id: None,
    }
}

pub fn test_lead_magnet(id: &str, user_id: &str, created_at: &str) -> LeadMagnet {
    LeadMagnet {
        id: id.to_string(),
        user_id: user_id.to_string(),
        title: format!("Title {}", id),
        topic: "Marketing".to_string(),
        kind: crate::lead_magnets::models::LeadMagnetType::Ebook,
        status: Default::default(),
        content: None,
        pdf_url: None,
        landing_page_url: None,
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
    }
}

pub struct MockBackend {
    session: Mutex<Option<Session>>,
    profiles: Mutex<HashMap<String, UserProfile>>,
    rows: Mutex<Vec<LeadMagnet>>,
    passwords: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<&'static str>>,
    fail_next: Mutex<Option<BackendError>>,
    session_gate: Mutex<Option<Arc<Notify>>>,
    events: broadcast::Sender<AuthChange>,
}

impl MockBackend {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            session: Mutex::new(None),
            profiles: Mutex::new(HashMap::new()),
            rows: Mutex::new(Vec::new()),
            passwords: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
            session_gate: Mutex::new(None),
            events,
        }
    }

    pub fn with_session(self, session: Session) -> Self {
        *self.session.lock().unwrap() = Some(session);
        self
    }

    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.id.clone(), profile);
        self
    }

    pub fn with_rows(self, rows: Vec<LeadMagnet>) -> Self {
        *self.rows.lock().unwrap() = rows;
        self
    }

    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.passwords
            .lock()
            .unwrap()
            .insert(email.to_string(), password.to_string());
        self
    }

    /// Makes `get_session` block until the returned handle is notified
    pub fn gate_session(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.session_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn fail_next(&self, error: BackendError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    pub fn calls(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == name)
            .count()
    }

    pub fn rows(&self) -> Vec<LeadMagnet> {
        self.rows.lock().unwrap().clone()
    }

    /// Pushes an auth change as if the provider had emitted it
    pub fn emit(&self, event: AuthEvent, session: Option<Session>) {
        *self.session.lock().unwrap() = session.clone();
        let _ = self.events.send(AuthChange { event, session });
    }

    fn record(&self, name: &'static str) -> Result<(), BackendError> {
        self.calls.lock().unwrap().push(name);
        match self.fail_next.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        self.record("sign_in")?;
        let known = self.passwords.lock().unwrap().get(email).cloned();
        if known.as_deref() != Some(password) {
            return Err(BackendError::Http {
                status: 400,
                code: Some("invalid_credentials".to_string()),
                message: "Invalid login credentials".to_string(),
            });
        }
        let session = test_session(&format!("user-{}", email), email);
        self.emit(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        _redirect_to: Option<&str>,
    ) -> Result<Option<Session>, BackendError> {
        self.record("sign_up")?;
        self.passwords
            .lock()
            .unwrap()
            .insert(email.to_string(), password.to_string());
        Ok(None)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.record("sign_out")?;
        if self.session.lock().unwrap().is_none() {
            return Err(BackendError::NotAuthenticated);
        }
        self.emit(AuthEvent::SignedOut, None);
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        let gate = self.session_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.record("get_session")?;
        Ok(self.session.lock().unwrap().clone())
    }

    async fn get_user(&self) -> Result<AuthUser, BackendError> {
        self.record("get_user")?;
        self.session
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.user.clone())
            .ok_or(BackendError::NotAuthenticated)
    }

    async fn exchange_code_for_session(&self, code: &str) -> Result<Session, BackendError> {
        self.record("exchange_code")?;
        if code != "valid-code" {
            return Err(BackendError::Http {
                status: 403,
                code: None,
                message: "Email link is invalid or has expired".to_string(),
            });
        }
        let session = test_session("confirmed-user", "confirmed@example.com");
        self.emit(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    fn on_auth_state_change(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, BackendError> {
        self.record("fetch_profile")?;
        Ok(self.profiles.lock().unwrap().get(user_id).cloned())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        updates: &ProfileUpdate,
    ) -> Result<UserProfile, BackendError> {
        self.record("update_profile")?;
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles.get_mut(user_id).ok_or(BackendError::NoRows)?;
        if let Some(email) = &updates.email {
            profile.email = email.clone();
        }
        if let Some(name) = &updates.name {
            profile.name = name.clone();
        }
        if let Some(tier) = updates.subscription_tier {
            profile.subscription_tier = tier;
        }
        if let Some(customer) = &updates.stripe_customer_id {
            profile.stripe_customer_id = customer.clone();
        }
        Ok(profile.clone())
    }

    async fn list_lead_magnets(&self) -> Result<Vec<LeadMagnet>, BackendError> {
        self.record("list_lead_magnets")?;
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_lead_magnet(&self, row: &LeadMagnetInsert) -> Result<LeadMagnet, BackendError> {
        self.record("insert_lead_magnet")?;
        let now = Utc::now().to_rfc3339();
        let created = LeadMagnet {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: row.user_id.clone(),
            title: row.title.clone(),
            topic: row.topic.clone(),
            kind: row.kind,
            status: row.status,
            content: row.content.clone(),
            pdf_url: row.pdf_url.clone(),
            landing_page_url: row.landing_page_url.clone(),
            created_at: now.clone(),
            updated_at: now,
        };
        self.rows.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_lead_magnet(
        &self,
        id: &str,
        updates: &LeadMagnetUpdate,
    ) -> Result<LeadMagnet, BackendError> {
        self.record("update_lead_magnet")?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(BackendError::NoRows)?;
        if let Some(title) = &updates.title {
            row.title = title.clone();
        }
        if let Some(topic) = &updates.topic {
            row.topic = topic.clone();
        }
        if let Some(kind) = updates.kind {
            row.kind = kind;
        }
        if let Some(status) = updates.status {
            row.status = status;
        }
        if let Some(content) = &updates.content {
            row.content = content.clone();
        }
        if let Some(pdf_url) = &updates.pdf_url {
            row.pdf_url = pdf_url.clone();
        }
        if let Some(landing) = &updates.landing_page_url {
            row.landing_page_url = landing.clone();
        }
        row.updated_at = Utc::now().to_rfc3339();
        Ok(row.clone())
    }

    async fn delete_lead_magnet(&self, id: &str) -> Result<(), BackendError> {
        self.record("delete_lead_magnet")?;
        self.rows.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }

    async fn test_connection(&self) -> Result<(), BackendError> {
        self.record("test_connection")
    }
}
