// src/lead_magnets/models.rs

use serde::{Deserialize, Serialize};

// ============================================================================
// Column Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadMagnetType {
    Ebook,
    Checklist,
    Template,
    Guide,
    Worksheet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeadMagnetStatus {
    #[default]
    Draft,
    Generating,
    Completed,
    Failed,
}

// ============================================================================
// Row Models
// ============================================================================

/// Row of the `lead_magnets` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadMagnet {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub topic: String,
    #[serde(rename = "type")]
    pub kind: LeadMagnetType,
    pub status: LeadMagnetStatus,
    pub content: Option<serde_json::Value>,
    pub pdf_url: Option<String>,
    pub landing_page_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Client-supplied part of an insert; `user_id` is always the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLeadMagnet {
    pub title: String,
    pub topic: String,
    #[serde(rename = "type")]
    pub kind: LeadMagnetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: LeadMagnetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_page_url: Option<String>,
}

/// Insert payload sent to the backend
#[derive(Debug, Clone, Serialize)]
pub struct LeadMagnetInsert {
    pub user_id: String,
    pub title: String,
    pub topic: String,
    #[serde(rename = "type")]
    pub kind: LeadMagnetType,
    pub status: LeadMagnetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landing_page_url: Option<String>,
}

impl LeadMagnetInsert {
    /// `description` is a form-only field; the table has no column for it
    pub fn for_user(user_id: &str, new: NewLeadMagnet) -> Self {
        Self {
            user_id: user_id.to_string(),
            title: new.title,
            topic: new.topic,
            kind: new.kind,
            status: new.status,
            content: new.content,
            pdf_url: new.pdf_url,
            landing_page_url: new.landing_page_url,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadMagnetUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<LeadMagnetType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadMagnetStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::common::helpers::double_option"
    )]
    pub content: Option<Option<serde_json::Value>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::common::helpers::double_option"
    )]
    pub pdf_url: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::common::helpers::double_option"
    )]
    pub landing_page_url: Option<Option<String>>,
}

impl LeadMagnetUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.topic.is_none()
            && self.kind.is_none()
            && self.status.is_none()
            && self.content.is_none()
            && self.pdf_url.is_none()
            && self.landing_page_url.is_none()
    }
}

// ============================================================================
// List State
// ============================================================================

/// Cached copy of the caller's rows; the remote table stays authoritative
#[derive(Debug, Clone, Serialize)]
pub struct LeadMagnetList {
    pub items: Vec<LeadMagnet>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for LeadMagnetList {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            error: None,
        }
    }
}
