// src/common/config.rs
//! Process configuration read once at startup

use std::env;
use std::time::Duration;

use crate::supabase::{ConfigError, SupabaseConfig};

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub simulated_generation: Duration,
    pub session_idle: Duration,
    pub secure_cookies: bool,
    pub supabase: Result<SupabaseConfig, ConfigError>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let secure_cookies = env::var("SECURE_COOKIES")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            == "true";

        Self {
            port,
            cors_origins,
            simulated_generation: Duration::from_millis(env_u64("SIMULATED_GENERATION_MS", 3000)),
            session_idle: Duration::from_secs(env_u64("SESSION_IDLE_SECS", 3600)),
            secure_cookies,
            supabase: SupabaseConfig::from_env(),
        }
    }
}

pub fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
