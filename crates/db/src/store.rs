//! [`PgAuthStore`] adapts the repositories to the core persistence contracts.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use gatehouse_core::error::StoreError;
use gatehouse_core::store::{NewSession, RefreshSession, SessionStore, User, UserStore};

use crate::repositories::{SessionRepo, UserRepo};

/// PostgreSQL-backed implementation of [`SessionStore`] and [`UserStore`].
#[derive(Clone)]
pub struct PgAuthStore {
    pool: PgPool,
}

impl PgAuthStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error onto the storage contract.
///
/// Unique violations (PostgreSQL error code 23505) surface as
/// [`StoreError::Conflict`] so the manager can treat a lost
/// delete-before-insert race as request failure rather than retry it.
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return StoreError::Conflict(db_err.constraint().unwrap_or("unknown").to_string());
        }
    }
    tracing::error!(error = %err, "storage backend error");
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl SessionStore for PgAuthStore {
    async fn create(&self, input: &NewSession) -> Result<RefreshSession, StoreError> {
        SessionRepo::create(&self.pool, input)
            .await
            .map(Into::into)
            .map_err(map_sqlx_error)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<RefreshSession>, StoreError> {
        SessionRepo::find_by_user_id(&self.pool, user_id)
            .await
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx_error)
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<bool, StoreError> {
        SessionRepo::delete_by_user_id(&self.pool, user_id)
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl UserStore for PgAuthStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        UserRepo::find_by_id(&self.pool, id)
            .await
            .map(|row| row.map(Into::into))
            .map_err(map_sqlx_error)
    }

    async fn create(&self, id: Uuid) -> Result<User, StoreError> {
        UserRepo::create(&self.pool, id)
            .await
            .map(Into::into)
            .map_err(map_sqlx_error)
    }
}
