// src/sessions/registry.rs

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::BrowserSession;
use crate::supabase::Backend;

const REAP_INTERVAL: Duration = Duration::from_secs(60);

/// Live browser sessions keyed by cookie value
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Arc<BrowserSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, backend: Arc<dyn Backend>) -> Arc<BrowserSession> {
        let id = Uuid::new_v4().to_string();
        let session = Arc::new(BrowserSession::start(id.clone(), backend));
        self.sessions.write().await.insert(id.clone(), session.clone());
        debug!(session_id = %id, "Browser session created");
        session
    }

    /// Looks a session up and refreshes its idle timer
    pub async fn get(&self, id: &str) -> Option<Arc<BrowserSession>> {
        let session = self.sessions.read().await.get(id).cloned()?;
        session.touch().await;
        Some(session)
    }

    pub async fn remove(&self, id: &str) -> Option<Arc<BrowserSession>> {
        let removed = self.sessions.write().await.remove(id);
        if let Some(session) = &removed {
            session.teardown();
            debug!(session_id = %id, "Browser session removed");
        }
        removed
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Tears down every session idle for longer than `max_idle`
    pub async fn reap_idle(&self, max_idle: Duration) -> usize {
        let max_idle = chrono::Duration::from_std(max_idle)
            .unwrap_or_else(|_| chrono::Duration::weeks(52 * 100));
        let now = Utc::now();

        let mut stale = Vec::new();
        for (id, session) in self.sessions.read().await.iter() {
            if now - session.last_seen().await > max_idle {
                stale.push(id.clone());
            }
        }

        for id in &stale {
            self.remove(id).await;
        }
        stale.len()
    }

    pub fn start_reaper_task(registry: SessionRegistry, max_idle: Duration) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(REAP_INTERVAL);
            loop {
                interval.tick().await;
                let reaped = registry.reap_idle(max_idle).await;
                if reaped > 0 {
                    info!(reaped, "Reaped idle browser sessions");
                }
            }
        });
    }
}
