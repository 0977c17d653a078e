// src/views/screens.rs
//! JSON view models, one per route-bound screen

use serde::Serialize;

use crate::auth::models::AuthState;
use crate::lead_magnets::models::{LeadMagnet, LeadMagnetList};
use crate::supabase::AuthEvent;
use crate::wizard::models::{
    ContentLength, GenerationResult, LeadMagnetForm, Tone, WizardStep, WIZARD_TYPES,
};
use crate::wizard::state::Wizard;

pub const APP_NAME: &str = "Lead Magnet AI";

/// Tried in order; the monogram is shown once every source has failed
pub const LOGO_SOURCES: [&str; 3] = [
    "https://i.imgur.com/djUszhJ.png",
    "https://rbhvcwzjvgatesivsxbb.supabase.co/storage/v1/object/public/instantleadmagnet/InstantLeadMagnet.png",
    "/logo.png",
];
pub const LOGO_MONOGRAM: &str = "LM";

const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Setup(SetupScreen),
    Loading { message: String },
    Redirect { to: String },
    Home(HomeScreen),
    Auth(AuthScreen),
    Dashboard(DashboardScreen),
    Create(CreateScreen),
    Preview(PreviewScreen),
    NotImplemented { title: String, back_to: String },
}

impl Screen {
    pub fn loading() -> Self {
        Screen::Loading {
            message: "Loading...".to_string(),
        }
    }

    pub fn redirect(to: &str) -> Self {
        Screen::Redirect { to: to.to_string() }
    }

    pub fn not_implemented(title: &str) -> Self {
        Screen::NotImplemented {
            title: title.to_string(),
            back_to: "/dashboard".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Link {
    pub label: &'static str,
    pub href: &'static str,
}

// ============================================================================
// Setup
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SetupScreen {
    pub title: &'static str,
    pub description: &'static str,
    pub instructions: Vec<&'static str>,
    pub env_vars: Vec<&'static str>,
    pub error: Option<String>,
}

impl SetupScreen {
    pub fn new(error: Option<String>) -> Self {
        Self {
            title: "Supabase Configuration Required",
            description: "Your Supabase credentials are not configured. Follow these steps to set up your database connection.",
            instructions: vec![
                "Go to supabase.com and sign in",
                "Create a new project or select your existing project",
                "Go to Settings → API in your Supabase dashboard",
                "Copy your Project URL and anon public key",
                "Add them to your .env file and restart the server",
            ],
            env_vars: vec!["SUPABASE_URL", "SUPABASE_ANON_KEY"],
            error,
        }
    }
}

// ============================================================================
// Home
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HomeScreen {
    pub title: &'static str,
    pub tagline: &'static str,
    pub primary_action: Link,
    pub secondary_action: Link,
}

impl HomeScreen {
    pub fn new(signed_in: bool) -> Self {
        let (primary, secondary) = if signed_in {
            (
                Link {
                    label: "Dashboard",
                    href: "/dashboard",
                },
                Link {
                    label: "Create Lead Magnet",
                    href: "/create",
                },
            )
        } else {
            (
                Link {
                    label: "Get Started",
                    href: "/auth",
                },
                Link {
                    label: "Dashboard",
                    href: "/dashboard",
                },
            )
        };

        Self {
            title: "Instant Lead Magnet AI",
            tagline: "Generate high-converting lead magnets with the power of AI. Create ebooks, checklists, templates, and guides in minutes.",
            primary_action: primary,
            secondary_action: secondary,
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Logo {
    pub sources: Vec<&'static str>,
    pub monogram: &'static str,
    pub alt: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthScreen {
    pub title: String,
    pub description: &'static str,
    pub logo: Logo,
    pub tabs: Vec<&'static str>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub sign_in: Link,
    pub sign_up: Link,
    pub password_hint: &'static str,
    pub legal_notice: &'static str,
}

impl AuthScreen {
    pub fn new(error: Option<String>, last_event: Option<AuthEvent>) -> Self {
        Self {
            title: format!("Welcome to {}", APP_NAME),
            description: "Sign in to your account or create a new one to start generating lead magnets",
            logo: Logo {
                sources: LOGO_SOURCES.to_vec(),
                monogram: LOGO_MONOGRAM,
                alt: APP_NAME,
            },
            tabs: vec!["signin", "signup"],
            error,
            success: last_event.and_then(event_message).map(str::to_string),
            sign_in: Link {
                label: "Sign In",
                href: "/api/auth/sign-in",
            },
            sign_up: Link {
                label: "Create Account",
                href: "/api/auth/sign-up",
            },
            password_hint: "Create a password (min 6 characters)",
            legal_notice: "By creating an account, you agree to our Terms of Service and Privacy Policy",
        }
    }
}

pub fn event_message(event: AuthEvent) -> Option<&'static str> {
    match event {
        AuthEvent::SignedIn => Some("Signed in successfully!"),
        AuthEvent::SignedOut => Some("You have been signed out."),
        AuthEvent::TokenRefreshed => None,
    }
}

// ============================================================================
// Dashboard
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardStats {
    pub total_lead_magnets: usize,
    pub total_downloads: u64,
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionCard {
    pub title: &'static str,
    pub description: &'static str,
    pub button: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GettingStartedStep {
    pub number: u8,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardScreen {
    pub email: Option<String>,
    pub welcome: &'static str,
    pub stats: DashboardStats,
    pub actions: Vec<ActionCard>,
    pub getting_started: Vec<GettingStartedStep>,
    pub recent: Vec<LeadMagnet>,
    pub lead_magnets_loading: bool,
    pub lead_magnets_error: Option<String>,
    pub current_lead_magnet: Option<LeadMagnet>,
}

impl DashboardScreen {
    pub fn new(auth: &AuthState, list: &LeadMagnetList, current: Option<LeadMagnet>) -> Self {
        Self {
            email: auth.email().map(str::to_string),
            welcome: "Ready to create some high-converting lead magnets with AI?",
            stats: DashboardStats {
                total_lead_magnets: list.items.len(),
                total_downloads: 0,
                conversion_rate: 0.0,
            },
            actions: vec![
                ActionCard {
                    title: "Create Lead Magnet",
                    description: "Generate a new lead magnet with AI assistance. Choose from templates or create from scratch.",
                    button: "Start Creating",
                    href: "/create",
                },
                ActionCard {
                    title: "My Lead Magnets",
                    description: "View, edit, and manage all your existing lead magnets in one place.",
                    button: "View Library",
                    href: "/library",
                },
                ActionCard {
                    title: "Analytics",
                    description: "Track performance, downloads, and conversion rates for your lead magnets.",
                    button: "View Analytics",
                    href: "/analytics",
                },
            ],
            getting_started: vec![
                GettingStartedStep {
                    number: 1,
                    title: "Choose Your Lead Magnet Type",
                    description: "Select from eBooks, checklists, templates, guides, and more.",
                },
                GettingStartedStep {
                    number: 2,
                    title: "Provide Your Topic & Audience",
                    description: "Tell our AI about your niche and target audience.",
                },
                GettingStartedStep {
                    number: 3,
                    title: "AI Generates Your Content",
                    description: "Our AI creates compelling, valuable content tailored to your audience.",
                },
                GettingStartedStep {
                    number: 4,
                    title: "Customize & Download",
                    description: "Edit, style, and export your lead magnet as PDF or other formats.",
                },
            ],
            recent: list.items.iter().take(RECENT_LIMIT).cloned().collect(),
            lead_magnets_loading: list.loading,
            lead_magnets_error: list.error.clone(),
            current_lead_magnet: current,
        }
    }
}

// ============================================================================
// Create
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub value: serde_json::Value,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeOption {
    #[serde(rename = "type")]
    pub kind: serde_json::Value,
    pub name: &'static str,
    pub description: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateScreen {
    pub step: WizardStep,
    pub step_number: u8,
    pub total_steps: u8,
    pub types: Vec<TypeOption>,
    pub form: LeadMagnetForm,
    pub tones: Vec<Choice>,
    pub lengths: Vec<Choice>,
    pub can_generate: bool,
    pub is_generating: bool,
}

impl CreateScreen {
    pub fn new(wizard: &Wizard) -> Self {
        let types = WIZARD_TYPES
            .iter()
            .map(|kind| TypeOption {
                kind: serde_json::to_value(kind).unwrap_or_default(),
                name: kind.name(),
                description: kind.description(),
                selected: wizard.form.kind == Some(*kind),
            })
            .collect();

        let tones = Tone::ALL
            .iter()
            .map(|tone| Choice {
                value: serde_json::to_value(tone).unwrap_or_default(),
                label: tone.label(),
            })
            .collect();

        let lengths = ContentLength::ALL
            .iter()
            .map(|length| Choice {
                value: serde_json::to_value(length).unwrap_or_default(),
                label: length.label(),
            })
            .collect();

        Self {
            step: wizard.step,
            step_number: wizard.step.number(),
            total_steps: 2,
            types,
            form: wizard.form.clone(),
            tones,
            lengths,
            can_generate: wizard.can_generate(),
            is_generating: wizard.is_generating,
        }
    }
}

// ============================================================================
// Preview
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PreviewScreen {
    pub lead_magnet_data: LeadMagnetForm,
    /// Absent until a generation pipeline fills it
    pub content: Option<serde_json::Value>,
    pub back_to: &'static str,
}

impl PreviewScreen {
    pub fn new(result: GenerationResult) -> Self {
        Self {
            lead_magnet_data: result.lead_magnet_data,
            content: result.content,
            back_to: "/create",
        }
    }
}
