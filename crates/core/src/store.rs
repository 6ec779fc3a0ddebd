//! Persistence contracts the session manager depends on.
//!
//! The manager sees behavior only: a PostgreSQL implementation lives in
//! `gatehouse-db`, and tests substitute an in-memory fake. Absence is a
//! distinguished outcome (`None` / `false`), never a generic storage error;
//! whether absence matters is the caller's business rule.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{DbId, Timestamp};

/// A user known to the credential service.
///
/// Created lazily on first login; the email address is registered out of
/// band and may be absent.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: Option<String>,
    pub created_at: Timestamp,
}

/// The current refresh session row for a user. At most one per user.
#[derive(Debug, Clone)]
pub struct RefreshSession {
    pub id: DbId,
    pub user_id: Uuid,
    /// Network origin recorded at creation/rotation.
    pub ip_address: String,
    /// Argon2 digest of the raw refresh token. Never the token itself.
    pub token_hash: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Input for persisting a new refresh session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: Uuid,
    pub ip_address: String,
    pub token_hash: String,
    pub expires_at: Timestamp,
}

/// Durable single-record-per-user store for refresh sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new session row.
    ///
    /// This is not an upsert: callers are expected to have deleted the prior
    /// row first, and a lost race surfaces as [`StoreError::Conflict`].
    async fn create(&self, input: &NewSession) -> Result<RefreshSession, StoreError>;

    /// Fetch the current session for a user.
    ///
    /// Expired rows are returned as-is; expiry is the manager's rule, so the
    /// caller can distinguish "expired" from "absent".
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<RefreshSession>, StoreError>;

    /// Remove the session for a user. Returns `false` if there was nothing
    /// to delete.
    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<bool, StoreError>;
}

/// Store of users known to the credential service.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Insert a user row with no email. Fails on duplicate id.
    async fn create(&self, id: Uuid) -> Result<User, StoreError>;
}
