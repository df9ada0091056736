pub mod config;
pub mod controllers;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod retry;
pub mod routes;
pub mod schema;
pub mod store;
pub mod views;

pub use config::{Config, ConfigError};
pub use controllers::health_with_store;
pub use retry::{wait_for_db, Connectivity, RetryPolicy};
pub use schema::init_schema;
pub use store::{Dialect, Store, StoreError};

/// Stato condiviso dagli handler, passato tramite `Extension<Arc<AppState>>`.
#[derive(Debug)]
pub struct AppState {
    pub store: Store,
    pub metrics: metrics::Metrics,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self { store, metrics: metrics::Metrics::new() }
    }
}
