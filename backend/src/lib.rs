pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod notify;
pub mod routes;
pub mod schema;
pub mod services;
pub mod store;
pub mod wizard;

use std::sync::Arc;

use notify::Notifier;
use store::SubmissionStore;

/// Shared application state passed to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SubmissionStore>,
    pub notifier: Notifier,
    pub config: config::AppConfig,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.backend())
            .field("notifier", &self.notifier)
            .field("config", &self.config)
            .finish()
    }
}
