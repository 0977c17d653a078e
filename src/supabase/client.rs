// src/supabase/client.rs
//! reqwest-backed client for the GoTrue and PostgREST endpoints

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use super::backend::Backend;
use super::config::SupabaseConfig;
use super::error::BackendError;
use super::models::{AuthChange, AuthEvent, AuthUser, Session, TokenResponse};
use super::pkce::PkcePair;
use super::query::{PostgrestQuery, SINGLE_OBJECT};
use crate::auth::models::{ProfileUpdate, UserProfile};
use crate::common::{safe_email_log, safe_token_log};
use crate::lead_magnets::models::{LeadMagnet, LeadMagnetInsert, LeadMagnetUpdate};

const AUTH_EVENT_CAPACITY: usize = 16;

/// Client bound to one project; holds a single visitor's session in memory
pub struct SupabaseClient {
    http: Client,
    config: SupabaseConfig,
    session: RwLock<Option<Session>>,
    code_verifier: RwLock<Option<String>>,
    events: broadcast::Sender<AuthChange>,
}

impl SupabaseClient {
    pub fn new(http: Client, config: SupabaseConfig) -> Self {
        let (events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);
        Self {
            http,
            config,
            session: RwLock::new(None),
            code_verifier: RwLock::new(None),
            events,
        }
    }

    fn with_keys(&self, builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        builder
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token.unwrap_or(self.config.anon_key.as_str()))
    }

    async fn set_session(&self, session: Option<Session>, event: AuthEvent) {
        *self.session.write().await = session.clone();
        // No receivers is fine: nobody is watching this browser session yet
        let _ = self.events.send(AuthChange { event, session });
    }

    async fn read_body<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(BackendError::from_response(status, &text));
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn token_grant(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<Session, BackendError> {
        let url = format!("{}?grant_type={}", self.config.auth_url("token"), grant_type);
        let response = self
            .with_keys(self.http.post(url), None)
            .json(&body)
            .send()
            .await?;
        let token: TokenResponse = Self::read_body(response).await?;
        Ok(token.into())
    }

    async fn refresh_session(&self, expired: &Session) -> Result<Session, BackendError> {
        debug!(
            user_id = %expired.user.id,
            refresh_token = %safe_token_log(&expired.refresh_token),
            "Refreshing expired session"
        );
        let refresh = json!({ "refresh_token": expired.refresh_token });
        match self.token_grant("refresh_token", refresh).await {
            Ok(session) => {
                self.set_session(Some(session.clone()), AuthEvent::TokenRefreshed).await;
                Ok(session)
            }
            Err(e) => {
                warn!(error = %e, user_id = %expired.user.id, "Session refresh failed");
                self.set_session(None, AuthEvent::SignedOut).await;
                Err(e)
            }
        }
    }

    async fn access_token(&self) -> Result<Option<String>, BackendError> {
        Ok(self.get_session().await?.map(|s| s.access_token))
    }

    /// Executes a PostgREST request with the visitor's token (or the anon key)
    pub async fn run<T: DeserializeOwned>(&self, query: PostgrestQuery) -> Result<T, BackendError> {
        let response = self.send_query(&query).await?;
        Self::read_body(response).await
    }

    pub async fn run_empty(&self, query: PostgrestQuery) -> Result<(), BackendError> {
        let response = self.send_query(&query).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await?;
        Err(BackendError::from_response(status, &text))
    }

    async fn send_query(&self, query: &PostgrestQuery) -> Result<Response, BackendError> {
        let token = self.access_token().await?;
        let url = query.url(&self.config.rest_url(&query.table));
        debug!(method = %query.method, table = %query.table, "PostgREST request");

        let mut builder = self.with_keys(
            self.http.request(query.method.clone(), url),
            token.as_deref(),
        );
        if query.single {
            builder = builder.header(ACCEPT, SINGLE_OBJECT);
        }
        if let Some(prefer) = query.prefer_header() {
            builder = builder.header("Prefer", prefer);
        }
        if let Some(body) = &query.body {
            builder = builder.json(body);
        }
        Ok(builder.send().await?)
    }
}

#[async_trait]
impl Backend for SupabaseClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let session = self
            .token_grant("password", json!({ "email": email, "password": password }))
            .await?;
        info!(email = %safe_email_log(email), user_id = %session.user.id, "Signed in");
        self.set_session(Some(session.clone()), AuthEvent::SignedIn).await;
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: Option<&str>,
    ) -> Result<Option<Session>, BackendError> {
        let pkce = PkcePair::generate();
        *self.code_verifier.write().await = Some(pkce.verifier.clone());

        let mut url = self.config.auth_url("signup");
        if let Some(redirect) = redirect_to {
            url = format!("{}?redirect_to={}", url, urlencoding::encode(redirect));
        }

        let response = self
            .with_keys(self.http.post(url), None)
            .json(&json!({
                "email": email,
                "password": password,
                "code_challenge": pkce.challenge,
                "code_challenge_method": "s256",
            }))
            .send()
            .await?;
        let body: serde_json::Value = Self::read_body(response).await?;

        // Autoconfirm projects answer with a full token bundle
        if body.get("access_token").is_some() {
            let session: Session = serde_json::from_value::<TokenResponse>(body)?.into();
            self.set_session(Some(session.clone()), AuthEvent::SignedIn).await;
            return Ok(Some(session));
        }

        info!(email = %safe_email_log(email), "Sign-up pending email confirmation");
        Ok(None)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let session = self.session.read().await.clone();
        let Some(session) = session else {
            return Err(BackendError::NotAuthenticated);
        };

        let response = self
            .with_keys(
                self.http.post(self.config.auth_url("logout")),
                Some(&session.access_token),
            )
            .send()
            .await;

        // The local session is dropped even when the provider call fails
        self.set_session(None, AuthEvent::SignedOut).await;

        let response = response?;
        let status = response.status();
        if status.is_success()
            || status == StatusCode::UNAUTHORIZED
            || status == StatusCode::NOT_FOUND
        {
            info!(user_id = %session.user.id, "Signed out");
            return Ok(());
        }
        let text = response.text().await?;
        Err(BackendError::from_response(status, &text))
    }

    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        let current = self.session.read().await.clone();
        match current {
            Some(session) if session.is_expired() => self.refresh_session(&session).await.map(Some),
            other => Ok(other),
        }
    }

    async fn get_user(&self) -> Result<AuthUser, BackendError> {
        let token = self
            .access_token()
            .await?
            .ok_or(BackendError::NotAuthenticated)?;
        let response = self
            .with_keys(self.http.get(self.config.auth_url("user")), Some(&token))
            .send()
            .await?;
        Self::read_body(response).await
    }

    async fn exchange_code_for_session(&self, code: &str) -> Result<Session, BackendError> {
        let verifier = self
            .code_verifier
            .write()
            .await
            .take()
            .ok_or(BackendError::MissingCodeVerifier)?;
        let session = self
            .token_grant("pkce", json!({ "auth_code": code, "code_verifier": verifier }))
            .await?;
        info!(user_id = %session.user.id, "Email confirmation exchanged for session");
        self.set_session(Some(session.clone()), AuthEvent::SignedIn).await;
        Ok(session)
    }

    fn on_auth_state_change(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, BackendError> {
        let query = PostgrestQuery::from("users")
            .select("*")
            .eq("id", user_id)
            .single();
        match self.run::<UserProfile>(query).await {
            Ok(profile) => Ok(Some(profile)),
            Err(BackendError::NoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn update_profile(
        &self,
        user_id: &str,
        updates: &ProfileUpdate,
    ) -> Result<UserProfile, BackendError> {
        let query = PostgrestQuery::from("users")
            .update(serde_json::to_value(updates)?)
            .eq("id", user_id)
            .select("*")
            .single();
        self.run(query).await
    }

    async fn list_lead_magnets(&self) -> Result<Vec<LeadMagnet>, BackendError> {
        let query = PostgrestQuery::from("lead_magnets")
            .select("*")
            .order("created_at", false);
        self.run(query).await
    }

    async fn insert_lead_magnet(&self, row: &LeadMagnetInsert) -> Result<LeadMagnet, BackendError> {
        let query = PostgrestQuery::from("lead_magnets")
            .insert(serde_json::to_value(row)?)
            .select("*")
            .single();
        self.run(query).await
    }

    async fn update_lead_magnet(
        &self,
        id: &str,
        updates: &LeadMagnetUpdate,
    ) -> Result<LeadMagnet, BackendError> {
        let query = PostgrestQuery::from("lead_magnets")
            .update(serde_json::to_value(updates)?)
            .eq("id", id)
            .select("*")
            .single();
        self.run(query).await
    }

    async fn delete_lead_magnet(&self, id: &str) -> Result<(), BackendError> {
        let query = PostgrestQuery::from("lead_magnets").delete().eq("id", id);
        self.run_empty(query).await
    }

    async fn test_connection(&self) -> Result<(), BackendError> {
        let query = PostgrestQuery::from("users").select("count").limit(1);
        self.run::<serde_json::Value>(query).await.map(|_| ())
    }
}
