//! Application state container shared across Axum route handlers and services.
//!
//! Holds the explicitly constructed database connection and configuration.
//! Handlers receive it through Axum's `State<T>` extractor.

use crate::config::AppConfig;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Central application state shared across the server.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Creates a new `AppState` from an open connection and loaded configuration.
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for async contexts or spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }
}
