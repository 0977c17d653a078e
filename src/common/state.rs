// Application state shared across all modules

use std::sync::Arc;

use crate::sessions::SessionRegistry;
use crate::supabase::Backend;
use crate::wizard::generator::ContentGenerator;

/// Builds a fresh backend client for one browser session
pub type BackendFactory = Arc<dyn Fn() -> Arc<dyn Backend> + Send + Sync>;

/// Application state containing the backend factory, live sessions, and configuration
#[derive(Clone)]
pub struct AppState {
    /// `None` when the Supabase environment is missing or invalid
    pub backend_factory: Option<BackendFactory>,
    pub config_error: Option<String>,
    pub sessions: SessionRegistry,
    pub generator: Arc<dyn ContentGenerator>,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn is_configured(&self) -> bool {
        self.backend_factory.is_some()
    }

    pub fn new_backend(&self) -> Option<Arc<dyn Backend>> {
        self.backend_factory.as_ref().map(|factory| factory())
    }
}
