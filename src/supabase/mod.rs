//! # Supabase Module
//!
//! Adapter over the hosted auth and data service:
//! - configuration validation (`SUPABASE_URL`, `SUPABASE_ANON_KEY`)
//! - GoTrue auth passthroughs and a push-style session change stream
//! - a small PostgREST query description used for the `users` and
//!   `lead_magnets` tables

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pkce;
pub mod query;

#[cfg(test)]
pub mod mock;

pub use backend::Backend;
pub use client::SupabaseClient;
pub use config::{ConfigError, SupabaseConfig};
pub use error::BackendError;
pub use models::{AuthChange, AuthEvent, AuthUser, Credentials, Session};
