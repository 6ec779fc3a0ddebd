//! Refresh session row model.

use sqlx::FromRow;
use uuid::Uuid;

use gatehouse_core::store::RefreshSession;
use gatehouse_core::types::{DbId, Timestamp};

/// A row from the `refresh_sessions` table.
///
/// `token_hash` holds the argon2 digest of the raw refresh token; the token
/// itself is never stored.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: DbId,
    pub user_id: Uuid,
    pub ip_address: String,
    pub token_hash: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl From<SessionRow> for RefreshSession {
    fn from(row: SessionRow) -> Self {
        RefreshSession {
            id: row.id,
            user_id: row.user_id,
            ip_address: row.ip_address,
            token_hash: row.token_hash,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}
