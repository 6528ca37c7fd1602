use std::sync::Arc;

use planboard_db::PgStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted internally.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: planboard_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Persistence for the favorites and search services.
    pub fn store(&self) -> PgStore {
        PgStore::new(self.pool.clone())
    }
}
