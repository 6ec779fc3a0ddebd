//! The credential session lifecycle manager.
//!
//! [`SessionManager`] coordinates the token codec, the credential hasher,
//! and the stores to implement login ([`new_session`](SessionManager::new_session))
//! and rotation ([`refresh_token`](SessionManager::refresh_token)), and
//! decides when an origin mismatch warrants an anomaly notification.
//!
//! Invariant: at most one live session per user. No in-process locking
//! protects it; safety relies on the store's unique constraint plus the
//! delete-before-insert sequencing below. A lost race between two concurrent
//! refreshes surfaces as `SessionNotFound` or a storage conflict and is never
//! retried here.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::AuthError;
use crate::hashing::CredentialHasher;
use crate::notify::AnomalyNotifier;
use crate::store::{NewSession, SessionStore, UserStore};
use crate::token::{TokenCodec, TokenPair};

pub struct SessionManager {
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
    notifier: Arc<dyn AnomalyNotifier>,
    codec: TokenCodec,
}

impl SessionManager {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn CredentialHasher>,
        notifier: Arc<dyn AnomalyNotifier>,
        codec: TokenCodec,
    ) -> Self {
        Self {
            sessions,
            users,
            hasher,
            notifier,
            codec,
        }
    }

    /// Issue a fresh token pair for the given user identifier.
    ///
    /// The user row is created on first sight; any prior session is
    /// superseded. The raw refresh token is returned exactly once — only its
    /// digest persists.
    pub async fn new_session(
        &self,
        user_id: &str,
        origin_ip: &str,
    ) -> Result<TokenPair, AuthError> {
        if user_id.is_empty() {
            return Err(AuthError::EmptyUserId);
        }
        let user_id = Uuid::parse_str(user_id).map_err(|_| AuthError::InvalidUserId)?;

        let pair = self.codec.issue_pair(user_id, origin_ip)?;

        if self.users.find_by_id(user_id).await?.is_none() {
            self.users.create(user_id).await?;
        }

        // No prior session is the common case; only a storage error aborts.
        self.sessions.delete_by_user_id(user_id).await?;

        self.persist_session(user_id, origin_ip, &pair).await?;

        Ok(pair)
    }

    /// Exchange a refresh token for a new pair, rotating the session.
    ///
    /// Every presented token that reaches the possession check is consumed
    /// exactly once: the session row is deleted before the expiry and origin
    /// rules run, so a replayed token can never succeed twice even when the
    /// overall request fails.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
        origin_ip: &str,
    ) -> Result<TokenPair, AuthError> {
        let user_id = self.codec.extract_user_id(refresh_token)?;

        let session = self
            .sessions
            .find_by_user_id(user_id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if !self.hasher.verify(refresh_token, &session.token_hash)? {
            return Err(AuthError::InvalidSession);
        }

        // Consume before any business rule. A concurrent refresh that got
        // here first already deleted the row; that request won.
        if !self.sessions.delete_by_user_id(user_id).await? {
            return Err(AuthError::SessionNotFound);
        }

        if session.expires_at < Utc::now() {
            return Err(AuthError::TokenExpired);
        }

        if session.ip_address != origin_ip {
            let user = self
                .users
                .find_by_id(user_id)
                .await?
                .ok_or(AuthError::UserNotFound)?;

            match user.email {
                Some(email) => {
                    tracing::warn!(user_id = %user_id, "refresh origin mismatch, dispatching warning");
                    self.notifier.notify_origin_mismatch(&email);
                }
                None => {
                    tracing::warn!(user_id = %user_id, "refresh origin mismatch, user has no registered email");
                }
            }

            return Err(AuthError::InvalidSession);
        }

        let pair = self.codec.issue_pair(user_id, origin_ip)?;
        self.persist_session(user_id, origin_ip, &pair).await?;

        Ok(pair)
    }

    /// Hash the raw refresh token and persist the session row for it.
    async fn persist_session(
        &self,
        user_id: Uuid,
        origin_ip: &str,
        pair: &TokenPair,
    ) -> Result<(), AuthError> {
        let token_hash = self.hasher.hash(&pair.refresh_token)?;

        self.sessions
            .create(&NewSession {
                user_id,
                ip_address: origin_ip.to_string(),
                token_hash,
                expires_at: Utc::now() + self.codec.refresh_ttl(),
            })
            .await?;

        Ok(())
    }
}
