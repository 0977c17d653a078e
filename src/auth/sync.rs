//! Mirrors the provider's session into an observable `AuthState`
//!
//! A background task fetches the initial session, then follows the
//! client's change stream. Every continuation re-checks the cancellation
//! token before publishing, so once `teardown` runs (or the handle is
//! dropped) late completions are discarded. In-flight requests themselves
//! are left to finish.

use std::sync::Arc;
use tokio::sync::{broadcast::error::RecvError, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::models::{AuthState, ProfileUpdate, UserProfile};
use crate::common::safe_email_log;
use crate::supabase::{AuthChange, Backend, BackendError};

/// Publishes into the shared state only while the owner is alive
#[derive(Clone)]
struct Publisher {
    tx: Arc<watch::Sender<AuthState>>,
    alive: CancellationToken,
}

impl Publisher {
    fn publish(&self, apply: impl FnOnce(&mut AuthState)) -> bool {
        if self.alive.is_cancelled() {
            return false;
        }
        self.tx.send_modify(apply);
        true
    }
}

pub struct AuthSync {
    backend: Option<Arc<dyn Backend>>,
    publisher: Publisher,
}

impl AuthSync {
    /// Activates synchronization against `backend`
    pub fn start(backend: Arc<dyn Backend>) -> Self {
        let (tx, _) = watch::channel(AuthState::default());
        let publisher = Publisher {
            tx: Arc::new(tx),
            alive: CancellationToken::new(),
        };

        // Subscribe before the initial fetch so no change is missed in between
        let changes = backend.on_auth_state_change();
        tokio::spawn(run(backend.clone(), publisher.clone(), changes));

        Self {
            backend: Some(backend),
            publisher,
        }
    }

    /// State for a server started without backend configuration
    pub fn unconfigured() -> Self {
        let (tx, _) = watch::channel(AuthState::unconfigured());
        Self {
            backend: None,
            publisher: Publisher {
                tx: Arc::new(tx),
                alive: CancellationToken::new(),
            },
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.publisher.tx.subscribe()
    }

    pub fn snapshot(&self) -> AuthState {
        self.publisher.tx.borrow().clone()
    }

    /// Waits until the state satisfies `ready`, or returns the current state
    /// if synchronization has already been torn down
    pub async fn wait_until(
        &self,
        ready: impl Fn(&AuthState) -> bool + Send + Sync,
    ) -> AuthState {
        let mut rx = self.subscribe();
        tokio::select! {
            state = rx.wait_for(|s| ready(s)) => match state {
                Ok(state) => state.clone(),
                Err(_) => self.snapshot(),
            },
            _ = self.publisher.alive.cancelled() => self.snapshot(),
        }
    }

    /// Stops publishing; later async completions become no-ops
    pub fn teardown(&self) {
        self.publisher.alive.cancel();
    }

    pub async fn sign_out(&self) -> Result<(), BackendError> {
        let backend = self.backend.as_ref().ok_or(BackendError::NotConfigured)?;
        backend.sign_out().await.map_err(|e| {
            error!(error = %e, "Error signing out");
            e
        })
    }

    /// Partial update of the signed-in user's profile row
    ///
    /// Rejected before any request when nobody is signed in.
    pub async fn update_profile(
        &self,
        updates: &ProfileUpdate,
    ) -> Result<UserProfile, BackendError> {
        let user_id = self.snapshot().user_id().map(str::to_owned);
        let (Some(backend), Some(user_id)) = (self.backend.as_ref(), user_id) else {
            return Err(BackendError::NotAuthenticated);
        };

        match backend.update_profile(&user_id, updates).await {
            Ok(profile) => {
                let mirrored = profile.clone();
                self.publisher.publish(|s| s.profile = Some(mirrored));
                Ok(profile)
            }
            Err(e) => {
                error!(error = %e, user_id = %user_id, "Error updating profile");
                Err(e)
            }
        }
    }
}

impl Drop for AuthSync {
    fn drop(&mut self) {
        self.publisher.alive.cancel();
    }
}

async fn run(
    backend: Arc<dyn Backend>,
    publisher: Publisher,
    mut changes: tokio::sync::broadcast::Receiver<AuthChange>,
) {
    load_initial_session(backend.as_ref(), &publisher).await;

    loop {
        tokio::select! {
            _ = publisher.alive.cancelled() => break,
            change = changes.recv() => match change {
                Ok(change) => apply_change(backend.as_ref(), &publisher, change).await,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Auth change stream lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    debug!("Auth synchronization stopped");
}

async fn load_initial_session(backend: &dyn Backend, publisher: &Publisher) {
    debug!("Getting initial session");
    let result = backend.get_session().await;

    match result {
        Ok(session) => {
            let user = session.as_ref().map(|s| s.user.clone());
            info!(
                email = %user
                    .as_ref()
                    .and_then(|u| u.email.as_deref())
                    .map(safe_email_log)
                    .unwrap_or_else(|| "No session".to_string()),
                "Initial session"
            );
            let published = publisher.publish(|s| {
                s.session = session;
                s.user = user.clone();
            });
            if !published {
                return;
            }
            if let Some(user) = user {
                fetch_profile(backend, publisher, &user.id).await;
            }
        }
        Err(e) => {
            error!(error = %e, "Error getting session");
            publisher.publish(|s| s.error = Some(e.to_string()));
        }
    }

    publisher.publish(|s| s.loading = false);
}

async fn apply_change(backend: &dyn Backend, publisher: &Publisher, change: AuthChange) {
    let user = change.session.as_ref().map(|s| s.user.clone());
    info!(
        event = ?change.event,
        user_id = %user.as_ref().map(|u| u.id.as_str()).unwrap_or("No user"),
        "Auth state changed"
    );

    let published = publisher.publish(|s| {
        s.session = change.session;
        s.user = user.clone();
        s.error = None;
        s.last_event = Some(change.event);
    });
    if !published {
        return;
    }

    match user {
        Some(user) => fetch_profile(backend, publisher, &user.id).await,
        None => {
            publisher.publish(|s| s.profile = None);
        }
    }

    publisher.publish(|s| s.loading = false);
}

async fn fetch_profile(backend: &dyn Backend, publisher: &Publisher, user_id: &str) {
    debug!(user_id = %user_id, "Fetching user profile");
    let result = backend.fetch_profile(user_id).await;

    match result {
        Ok(Some(profile)) => {
            debug!(user_id = %user_id, "User profile loaded");
            publisher.publish(|s| s.profile = Some(profile));
        }
        Ok(None) => {
            debug!(user_id = %user_id, "No user profile found, will be created by trigger");
        }
        Err(e) => {
            if !publisher.alive.is_cancelled() {
                error!(error = %e, user_id = %user_id, "Error fetching user profile");
            }
        }
    }
}
