// src/supabase/config.rs
//! Project URL and public key for the hosted backend

use reqwest::Url;
use std::env;

const URL_VARS: [&str; 2] = ["SUPABASE_URL", "VITE_SUPABASE_URL"];
const KEY_VARS: [&str; 2] = ["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing Supabase environment variables")]
    Missing,

    #[error("Invalid Supabase URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    base_url: String,
    pub anon_key: String,
}

impl SupabaseConfig {
    pub fn new(url: &str, anon_key: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        let anon_key = anon_key.trim();

        if url.is_empty() || anon_key.is_empty() {
            return Err(ConfigError::Missing);
        }
        if !is_valid_supabase_url(url) {
            return Err(ConfigError::InvalidUrl(url.to_string()));
        }

        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    /// Reads `SUPABASE_URL` / `SUPABASE_ANON_KEY`, falling back to the `VITE_` names
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = first_env(&URL_VARS).ok_or(ConfigError::Missing)?;
        let key = first_env(&KEY_VARS).ok_or(ConfigError::Missing)?;
        Self::new(&url, &key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// Accepts hosted projects and local development stacks only
pub fn is_valid_supabase_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| host.contains("supabase.co") || host.contains("localhost"))
            .unwrap_or(false),
        Err(_) => false,
    }
}
