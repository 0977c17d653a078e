// src/lead_magnets/store.rs
//! Per-session cache of the signed-in user's lead magnets
//!
//! Follows the auth state: a new identity triggers a refetch, signing out
//! clears the list. Writes hit the backend first and are mirrored into the
//! cache only once the server has confirmed them.

use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::models::{
    LeadMagnet, LeadMagnetInsert, LeadMagnetList, LeadMagnetUpdate, NewLeadMagnet,
};
use crate::auth::models::AuthState;
use crate::supabase::{Backend, BackendError};

/// Store failures keep the backend error so the HTTP layer can map its status
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("User must be authenticated")]
    NotAuthenticated,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

struct Inner {
    backend: Arc<dyn Backend>,
    list: watch::Sender<LeadMagnetList>,
    /// Identity the list was last refetched or cleared for
    synced: watch::Sender<Option<Option<String>>>,
    alive: CancellationToken,
}

impl Inner {
    fn publish(&self, apply: impl FnOnce(&mut LeadMagnetList)) -> bool {
        if self.alive.is_cancelled() {
            return false;
        }
        self.list.send_modify(apply);
        true
    }

    async fn refetch(&self) -> Result<(), StoreError> {
        self.publish(|l| {
            l.loading = true;
            l.error = None;
        });

        let result = self.backend.list_lead_magnets().await;
        match result {
            Ok(rows) => {
                debug!(count = rows.len(), "Lead magnets loaded");
                self.publish(|l| {
                    l.items = rows;
                    l.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error fetching lead magnets");
                let message = e.to_string();
                self.publish(|l| {
                    l.error = Some(message);
                    l.loading = false;
                });
                Err(e.into())
            }
        }
    }

    fn clear(&self) {
        self.publish(|l| {
            l.items.clear();
            l.loading = false;
        });
    }
}

pub struct LeadMagnetStore {
    inner: Arc<Inner>,
    auth: watch::Receiver<AuthState>,
}

impl LeadMagnetStore {
    pub fn start(backend: Arc<dyn Backend>, auth: watch::Receiver<AuthState>) -> Self {
        let (list, _) = watch::channel(LeadMagnetList::default());
        let (synced, _) = watch::channel(None);
        let inner = Arc::new(Inner {
            backend,
            list,
            synced,
            alive: CancellationToken::new(),
        });

        tokio::spawn(follow_identity(inner.clone(), auth.clone()));

        Self { inner, auth }
    }

    pub fn snapshot(&self) -> LeadMagnetList {
        self.inner.list.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LeadMagnetList> {
        self.inner.list.subscribe()
    }

    /// Waits until the list reflects the current identity and no fetch is
    /// in flight, or returns the current list once torn down
    pub async fn wait_loaded(&self) -> LeadMagnetList {
        let mut synced = self.inner.synced.subscribe();
        let mut list = self.subscribe();
        let auth = self.auth.clone();

        let ready = async {
            synced
                .wait_for(|s| {
                    let current = auth.borrow().user_id().map(str::to_owned);
                    s.as_ref() == Some(&current)
                })
                .await
                .ok()?;
            let loaded = list.wait_for(|l| !l.loading).await.ok()?;
            Some((*loaded).clone())
        };

        tokio::select! {
            loaded = ready => loaded.unwrap_or_else(|| self.snapshot()),
            _ = self.inner.alive.cancelled() => self.snapshot(),
        }
    }

    pub fn find(&self, id: &str) -> Option<LeadMagnet> {
        self.inner
            .list
            .borrow()
            .items
            .iter()
            .find(|lm| lm.id == id)
            .cloned()
    }

    pub async fn refetch(&self) -> Result<(), StoreError> {
        self.inner.refetch().await
    }

    pub async fn create(&self, new: NewLeadMagnet) -> Result<LeadMagnet, StoreError> {
        let user_id = self.auth.borrow().user_id().map(str::to_owned);
        let Some(user_id) = user_id else {
            return Err(StoreError::NotAuthenticated);
        };

        let row = LeadMagnetInsert::for_user(&user_id, new);
        match self.inner.backend.insert_lead_magnet(&row).await {
            Ok(created) => {
                info!(user_id = %user_id, lead_magnet_id = %created.id, "Lead magnet created");
                let cached = created.clone();
                self.inner.publish(|l| l.items.insert(0, cached));
                Ok(created)
            }
            Err(e) => {
                error!(error = %e, user_id = %user_id, "Error creating lead magnet");
                Err(e.into())
            }
        }
    }

    pub async fn update(
        &self,
        id: &str,
        updates: &LeadMagnetUpdate,
    ) -> Result<LeadMagnet, StoreError> {
        let updated = self.inner.backend.update_lead_magnet(id, updates).await?;
        let cached = updated.clone();
        self.inner.publish(|l| {
            for item in l.items.iter_mut().filter(|lm| lm.id == id) {
                *item = cached.clone();
            }
        });
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.inner.backend.delete_lead_magnet(id).await?;
        self.inner.publish(|l| l.items.retain(|lm| lm.id != id));
        info!(lead_magnet_id = %id, "Lead magnet deleted");
        Ok(())
    }

    pub fn teardown(&self) {
        self.inner.alive.cancel();
    }
}

impl Drop for LeadMagnetStore {
    fn drop(&mut self) {
        self.inner.alive.cancel();
    }
}

async fn follow_identity(inner: Arc<Inner>, mut auth: watch::Receiver<AuthState>) {
    let mut last_seen: Option<Option<String>> = None;

    loop {
        let (settled, current) = {
            let state = auth.borrow_and_update();
            (!state.loading, state.user_id().map(str::to_owned))
        };
        if settled && last_seen.as_ref() != Some(&current) {
            last_seen = Some(current.clone());
            match current {
                // Failures are already recorded in the list state
                Some(_) => {
                    let _ = inner.refetch().await;
                }
                None => inner.clear(),
            }
            inner.synced.send_replace(Some(current));
        }

        tokio::select! {
            _ = inner.alive.cancelled() => break,
            changed = auth.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
}
