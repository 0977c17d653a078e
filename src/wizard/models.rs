// src/wizard/models.rs

use serde::{Deserialize, Serialize};

// ============================================================================
// Choices
// ============================================================================

/// Step-one options; `Cheatsheet` has no counterpart in the table enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardType {
    Ebook,
    Checklist,
    Template,
    Guide,
    Cheatsheet,
}

pub const WIZARD_TYPES: [WizardType; 5] = [
    WizardType::Ebook,
    WizardType::Checklist,
    WizardType::Template,
    WizardType::Guide,
    WizardType::Cheatsheet,
];

impl WizardType {
    pub fn name(&self) -> &'static str {
        match self {
            WizardType::Ebook => "eBook",
            WizardType::Checklist => "Checklist",
            WizardType::Template => "Template",
            WizardType::Guide => "Quick Guide",
            WizardType::Cheatsheet => "Cheat Sheet",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WizardType::Ebook => "Comprehensive guide or educational content",
            WizardType::Checklist => "Step-by-step actionable checklist",
            WizardType::Template => "Ready-to-use template or worksheet",
            WizardType::Guide => "Concise how-to guide or tutorial",
            WizardType::Cheatsheet => "Quick reference or summary sheet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Authoritative,
    Casual,
}

impl Tone {
    pub const ALL: [Tone; 4] = [
        Tone::Professional,
        Tone::Friendly,
        Tone::Authoritative,
        Tone::Casual,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Friendly => "Friendly & Conversational",
            Tone::Authoritative => "Authoritative",
            Tone::Casual => "Casual",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl ContentLength {
    pub const ALL: [ContentLength; 3] = [
        ContentLength::Short,
        ContentLength::Medium,
        ContentLength::Long,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContentLength::Short => "Short (1-2 pages)",
            ContentLength::Medium => "Medium (3-5 pages)",
            ContentLength::Long => "Long (6+ pages)",
        }
    }
}

// ============================================================================
// Form State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    TypeSelection,
    Details,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::TypeSelection => 1,
            WizardStep::Details => 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadMagnetForm {
    #[serde(rename = "type")]
    pub kind: Option<WizardType>,
    pub title: String,
    pub topic: String,
    pub audience: String,
    pub description: String,
    pub tone: Tone,
    pub length: ContentLength,
}

/// Partial edit of the step-two fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldUpdate {
    pub title: Option<String>,
    pub topic: Option<String>,
    pub audience: Option<String>,
    pub description: Option<String>,
    pub tone: Option<Tone>,
    pub length: Option<ContentLength>,
}

#[derive(Debug, Deserialize)]
pub struct SelectTypeRequest {
    #[serde(rename = "type")]
    pub kind: WizardType,
}

/// Result of a (simulated) generation run, carried to `/preview`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    pub navigate_to: String,
    pub lead_magnet_data: LeadMagnetForm,
    /// Always `None`: no generation pipeline is wired in
    pub content: Option<serde_json::Value>,
}
