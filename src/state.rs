//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::DatabasePool;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// The database pool is injected here rather than held globally, so tests can
/// build a router around a fake pool.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<dyn DatabasePool>,
}

impl AppState {
    /// Creates a new application state from the given configuration and pool.
    pub fn new(config: AppConfig, db: Arc<dyn DatabasePool>) -> Self {
        Self {
            config: Arc::new(config),
            db,
        }
    }
}
