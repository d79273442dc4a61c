//! Crate entrypoint wiring together configuration, the PowerDNS database and
//! the dyndns2 update endpoint.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod dyndns;
pub mod error;
pub mod validation;

use config::AppConfig;
use db::store::SqlStore;

use std::sync::Arc;

/// Complete application dependencies shared across handlers.
pub struct AppState {
    pub config: AppConfig,
    pub store: SqlStore,
}

impl AppState {
    pub fn new(config: AppConfig, db: db::Db) -> Self {
        let store = SqlStore::new(db, config.default_ttl).with_timezone(config.serial_timezone);
        Self { config, store }
    }
}

/// Arc-wrapped version of `AppState` passed into Axum extensions.
pub type SharedState = Arc<AppState>;
