//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::GradingConfig;
use crate::db::repository::FullRepository;
use crate::services::SessionStore;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn FullRepository>,
    /// Bearer-token sessions
    pub sessions: SessionStore,
    /// Exam weights for student grading
    pub grading: GradingConfig,
}

impl AppState {
    /// Create a new application state with default grading weights.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            sessions: SessionStore::new(),
            grading: GradingConfig::default(),
        }
    }

    pub fn with_grading(mut self, grading: GradingConfig) -> Self {
        self.grading = grading;
        self
    }
}
