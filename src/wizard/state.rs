// src/wizard/state.rs
//! Two-step create form

use serde::Serialize;

use super::models::{FieldUpdate, LeadMagnetForm, WizardStep, WizardType};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    #[error("Select a lead magnet type first")]
    TypeNotSelected,

    #[error("Title, topic and audience are required")]
    Incomplete,

    #[error("Generation already in progress")]
    AlreadyGenerating,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Wizard {
    pub step: WizardStep,
    pub form: LeadMagnetForm,
    pub is_generating: bool,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_type(&mut self, kind: WizardType) {
        self.form.kind = Some(kind);
        self.step = WizardStep::Details;
    }

    /// Returns to type selection; entered fields are kept
    pub fn back(&mut self) {
        self.step = WizardStep::TypeSelection;
    }

    pub fn apply(&mut self, update: FieldUpdate) -> Result<(), WizardError> {
        if self.step != WizardStep::Details {
            return Err(WizardError::TypeNotSelected);
        }

        let form = &mut self.form;
        if let Some(title) = update.title {
            form.title = title;
        }
        if let Some(topic) = update.topic {
            form.topic = topic;
        }
        if let Some(audience) = update.audience {
            form.audience = audience;
        }
        if let Some(description) = update.description {
            form.description = description;
        }
        if let Some(tone) = update.tone {
            form.tone = tone;
        }
        if let Some(length) = update.length {
            form.length = length;
        }
        Ok(())
    }

    pub fn has_required_fields(&self) -> bool {
        [&self.form.title, &self.form.topic, &self.form.audience]
            .iter()
            .all(|value| !value.trim().is_empty())
    }

    /// Gate for the generate action
    pub fn can_generate(&self) -> bool {
        self.step == WizardStep::Details
            && self.form.kind.is_some()
            && self.has_required_fields()
            && !self.is_generating
    }

    /// Marks generation as started and hands back the payload to generate from
    pub fn begin_generation(&mut self) -> Result<LeadMagnetForm, WizardError> {
        if self.is_generating {
            return Err(WizardError::AlreadyGenerating);
        }
        if self.step != WizardStep::Details || self.form.kind.is_none() {
            return Err(WizardError::TypeNotSelected);
        }
        if !self.has_required_fields() {
            return Err(WizardError::Incomplete);
        }
        self.is_generating = true;
        Ok(self.form.clone())
    }

    pub fn finish_generation(&mut self) {
        self.is_generating = false;
    }
}
