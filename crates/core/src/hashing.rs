//! Argon2id protection of refresh-token secrets at rest.
//!
//! The raw refresh token is returned to the client exactly once; only its
//! salted Argon2id digest is persisted, so a database leak does not
//! compromise active sessions. The PHC string format is used for storage so
//! that algorithm parameters and salt are embedded in the digest itself.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::AuthError;

/// One-way hashing and verification of refresh-token secrets.
///
/// A mismatch on [`verify`](CredentialHasher::verify) is a value
/// (`Ok(false)`), not an error: callers treat it as "refresh denied" and must
/// never crash on it.
pub trait CredentialHasher: Send + Sync {
    /// Produce a salted one-way digest of the secret.
    fn hash(&self, secret: &str) -> Result<String, AuthError>;

    /// Check a presented secret against a stored digest.
    fn verify(&self, secret: &str, digest: &str) -> Result<bool, AuthError>;
}

/// Argon2id with default parameters and a random per-digest salt.
///
/// The adaptive cost is deliberate: it dominates per-request latency and is
/// the brute-force resistance for stolen session tables.
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(digest.to_string())
    }

    fn verify(&self, secret: &str, digest: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(digest).map_err(|e| AuthError::Hashing(e.to_string()))?;
        match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Hashing(e.to_string())),
        }
    }
}
