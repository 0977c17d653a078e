// src/ui_store.rs
//! Ephemeral UI state shared between screens of one browser session
//!
//! Nothing here is persisted; it disappears with the session.

use serde::Serialize;
use tokio::sync::RwLock;

use crate::lead_magnets::models::LeadMagnet;
use crate::wizard::models::GenerationResult;

#[derive(Debug, Clone, Default, Serialize)]
pub struct UiState {
    pub current_lead_magnet: Option<LeadMagnet>,
    pub is_generating: bool,
    /// Navigation payload handed from the create wizard to the preview screen
    pub last_generation: Option<GenerationResult>,
}

#[derive(Default)]
pub struct UiStore {
    state: RwLock<UiState>,
}

impl UiStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> UiState {
        self.state.read().await.clone()
    }

    pub async fn set_current_lead_magnet(&self, lead_magnet: Option<LeadMagnet>) {
        self.state.write().await.current_lead_magnet = lead_magnet;
    }

    pub async fn set_is_generating(&self, is_generating: bool) {
        self.state.write().await.is_generating = is_generating;
    }

    pub async fn set_last_generation(&self, result: GenerationResult) {
        self.state.write().await.last_generation = Some(result);
    }

    /// Drops a selection that points at a row no longer in the cache
    pub async fn forget_lead_magnet(&self, id: &str) {
        let mut state = self.state.write().await;
        if state
            .current_lead_magnet
            .as_ref()
            .is_some_and(|lm| lm.id == id)
        {
            state.current_lead_magnet = None;
        }
    }
}
