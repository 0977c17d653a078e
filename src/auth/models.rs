//! Authentication data models

use serde::{Deserialize, Serialize};

use crate::supabase::{AuthEvent, AuthUser, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Pro,
    Enterprise,
}

/// Row of the `users` table, created by a server-side trigger on first sign-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub subscription_tier: SubscriptionTier,
    pub stripe_customer_id: Option<String>,
}

/// Partial update of the owner's profile row
///
/// `Option<Option<_>>` distinguishes "leave unchanged" from "set to null".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::common::helpers::double_option"
    )]
    pub name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_tier: Option<SubscriptionTier>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::common::helpers::double_option"
    )]
    pub stripe_customer_id: Option<Option<String>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.name.is_none()
            && self.subscription_tier.is_none()
            && self.stripe_customer_id.is_none()
    }
}

/// Mirrored view of the provider's auth state for one browser session
#[derive(Debug, Clone, Serialize)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub profile: Option<UserProfile>,
    #[serde(skip)]
    pub session: Option<Session>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_event: Option<AuthEvent>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            profile: None,
            session: None,
            loading: true,
            error: None,
            last_event: None,
        }
    }
}

impl AuthState {
    pub fn unconfigured() -> Self {
        Self {
            loading: false,
            error: Some("Supabase not configured".to_string()),
            ..Self::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    pub fn email(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.email.as_deref())
            .or_else(|| self.profile.as_ref().map(|p| p.email.as_str()))
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthCallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthPageQuery {
    pub error: Option<String>,
}
