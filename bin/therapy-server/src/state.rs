//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use therapy_core::CompletionClient;

use crate::config::Config;
use crate::entities::SqliteStore;
use crate::services::SessionService;

/// State shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Persistent session / message store.
    pub store: Arc<SqliteStore>,
    /// Session workflow, wired to the store and the completion provider.
    pub sessions: SessionService,
}

impl AppState {
    pub fn new(config: Config, store: SqliteStore, llm: Arc<dyn CompletionClient>) -> Self {
        let store = Arc::new(store);
        Self {
            config: Arc::new(config),
            sessions: SessionService::new(Arc::clone(&store), llm),
            store,
        }
    }
}
