use std::sync::Arc;

use gatehouse_core::SessionManager;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (used directly only by the health check).
    pub pool: gatehouse_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The credential session lifecycle manager.
    pub manager: Arc<SessionManager>,
}
