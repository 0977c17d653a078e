// src/wizard/generator.rs
//! Seam for lead magnet content generation
//!
//! No generation pipeline exists behind this trait yet. The only
//! implementation waits a fixed delay and returns the form unchanged, so
//! the create flow can run end to end.

use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use super::models::{GenerationResult, LeadMagnetForm};

pub const PREVIEW_ROUTE: &str = "/preview";

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, form: &LeadMagnetForm) -> GenerationResult;
}

pub struct SimulatedGenerator {
    delay: Duration,
}

impl SimulatedGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ContentGenerator for SimulatedGenerator {
    async fn generate(&self, form: &LeadMagnetForm) -> GenerationResult {
        info!(
            kind = ?form.kind,
            delay_ms = self.delay.as_millis() as u64,
            "Simulating lead magnet generation"
        );
        tokio::time::sleep(self.delay).await;

        GenerationResult {
            navigate_to: PREVIEW_ROUTE.to_string(),
            lead_magnet_data: form.clone(),
            content: None,
        }
    }
}
