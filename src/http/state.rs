//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::config::AppConfig;
use crate::db::repository::FullRepository;
use crate::services::notifier::Notifier;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Notification collaborator (fire-and-forget)
    pub notifier: Arc<dyn Notifier>,
    /// Application configuration (waitlist policy, validation lookahead)
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new application state with the given collaborators.
    pub fn new(
        repository: Arc<dyn FullRepository>,
        notifier: Arc<dyn Notifier>,
        config: AppConfig,
    ) -> Self {
        Self {
            repository,
            notifier,
            config: Arc::new(config),
        }
    }
}
