//! PostgreSQL persistence for gatehouse.
//!
//! - [`models`] — row types mapped from the `users` and `refresh_sessions`
//!   tables.
//! - [`repositories`] — query-level CRUD ([`UserRepo`], [`SessionRepo`]).
//! - [`store`] — [`PgAuthStore`], the adapter implementing the core
//!   persistence contracts over a connection pool.
//!
//! [`UserRepo`]: repositories::UserRepo
//! [`SessionRepo`]: repositories::SessionRepo

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub mod models;
pub mod repositories;
pub mod store;

pub use store::PgAuthStore;

/// Alias so downstream crates don't import sqlx for the pool type.
pub type DbPool = PgPool;

/// Default maximum pool connections.
const MAX_CONNECTIONS: u32 = 10;

/// Create a connection pool against the given database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Cheap connectivity probe used by startup and the health endpoint.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
