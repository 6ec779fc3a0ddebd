//! Access/refresh token pair construction and parsing.
//!
//! Access tokens are HMAC-signed JWTs containing an [`AccessClaims`] payload
//! and are verifiable without a store lookup. Refresh tokens are opaque:
//! 16 cryptographically random bytes immediately followed by the 16 raw bytes
//! of the user UUID, base64url-encoded. The random prefix is the actual
//! bearer secret; the embedded UUID lets the manager recover which user a
//! refresh token belongs to with a single indexed lookup instead of scanning
//! all sessions by secret.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Length in bytes of the random refresh-token secret prefix.
const REFRESH_SECRET_LEN: usize = 16;

/// Length in bytes of a raw UUID.
const USER_ID_LEN: usize = 16;

/// Token kind carried in the JWT `sub` claim.
const ACCESS_KIND: &str = "access";

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;

/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 30;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// Token kind, always `"access"`.
    pub sub: String,
    /// The user this token was issued to.
    pub user_id: Uuid,
    /// Network origin at issuance.
    pub ip: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// A freshly minted pair of raw tokens. Never persisted.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Configuration for token generation and validation.
///
/// The signing secret is an explicit value injected at construction; there is
/// no ambient lookup anywhere else in the crate.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Symmetric HMAC secret used to sign and verify access tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_ttl_mins: i64,
    /// Refresh session lifetime in days (default: 30).
    pub refresh_ttl_days: i64,
}

impl TokenConfig {
    /// Load token configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_ttl_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_ttl_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            access_ttl_mins,
            refresh_ttl_days,
        }
    }
}

/// Builds and parses token pairs.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    config: TokenConfig,
}

impl TokenCodec {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    /// How long a refresh session stays valid from issuance.
    pub fn refresh_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.config.refresh_ttl_days)
    }

    /// Mint a signed access token and an opaque refresh token for the user.
    ///
    /// Signing failure is fatal to the request and is surfaced, not retried.
    pub fn issue_pair(&self, user_id: Uuid, origin_ip: &str) -> Result<TokenPair, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = AccessClaims {
            sub: ACCESS_KIND.to_string(),
            user_id,
            ip: origin_ip.to_string(),
            iat: now,
            exp: now + self.config.access_ttl_mins * 60,
        };

        let access_token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))?;

        let mut raw = [0u8; REFRESH_SECRET_LEN + USER_ID_LEN];
        rand::rng().fill(&mut raw[..REFRESH_SECRET_LEN]);
        raw[REFRESH_SECRET_LEN..].copy_from_slice(user_id.as_bytes());

        Ok(TokenPair {
            access_token,
            refresh_token: URL_SAFE.encode(raw),
        })
    }

    /// Verify and decode an access token.
    ///
    /// Accepted signature algorithms are pinned to the HMAC family; a token
    /// carrying any other algorithm is rejected outright to prevent
    /// algorithm-confusion forgery.
    pub fn parse_access(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.sub = Some(ACCESS_KIND.to_string());

        let data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        Ok(data.claims)
    }

    /// Recover the user id embedded in a refresh token.
    ///
    /// This is the only validation possible without the store: it proves the
    /// token's shape, never possession. The decoded length must be exactly
    /// secret-prefix plus raw UUID.
    pub fn extract_user_id(&self, refresh_token: &str) -> Result<Uuid, AuthError> {
        let decoded = URL_SAFE
            .decode(refresh_token)
            .map_err(|_| AuthError::InvalidToken)?;

        if decoded.len() != REFRESH_SECRET_LEN + USER_ID_LEN {
            return Err(AuthError::InvalidToken);
        }

        Uuid::from_slice(&decoded[REFRESH_SECRET_LEN..]).map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    /// Helper to build a test codec with a known secret.
    fn test_codec() -> TokenCodec {
        TokenCodec::new(TokenConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_ttl_mins: 15,
            refresh_ttl_days: 30,
        })
    }

    #[test]
    fn issue_and_parse_access_token() {
        let codec = test_codec();
        let user_id = Uuid::new_v4();

        let pair = codec
            .issue_pair(user_id, "10.0.0.1")
            .expect("issuing should succeed");
        let claims = codec
            .parse_access(&pair.access_token)
            .expect("parsing should succeed");

        assert_eq!(claims.sub, "access");
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.ip, "10.0.0.1");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_token_round_trips_user_id() {
        let codec = test_codec();
        let user_id = Uuid::new_v4();

        let pair = codec.issue_pair(user_id, "10.0.0.1").unwrap();
        let extracted = codec
            .extract_user_id(&pair.refresh_token)
            .expect("extraction should succeed");

        assert_eq!(extracted, user_id);
    }

    #[test]
    fn refresh_tokens_differ_between_issues() {
        let codec = test_codec();
        let user_id = Uuid::new_v4();

        let a = codec.issue_pair(user_id, "10.0.0.1").unwrap();
        let b = codec.issue_pair(user_id, "10.0.0.1").unwrap();
        assert_ne!(a.refresh_token, b.refresh_token);
    }

    #[test]
    fn expired_access_token_fails() {
        // Negative TTL puts exp well beyond the default 60-second leeway.
        let codec = TokenCodec::new(TokenConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_ttl_mins: -5,
            refresh_ttl_days: 30,
        });

        let pair = codec.issue_pair(Uuid::new_v4(), "10.0.0.1").unwrap();
        assert_matches!(
            codec.parse_access(&pair.access_token),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let codec = test_codec();
        let other = TokenCodec::new(TokenConfig {
            secret: "a-completely-different-secret".to_string(),
            access_ttl_mins: 15,
            refresh_ttl_days: 30,
        });

        let pair = other.issue_pair(Uuid::new_v4(), "10.0.0.1").unwrap();
        assert_matches!(
            codec.parse_access(&pair.access_token),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn any_hmac_family_algorithm_is_accepted() {
        let codec = test_codec();
        let claims = AccessClaims {
            sub: "access".to_string(),
            user_id: Uuid::new_v4(),
            ip: "10.0.0.1".to_string(),
            iat: chrono::Utc::now().timestamp(),
            exp: chrono::Utc::now().timestamp() + 900,
        };

        // Same secret, HS256 instead of HS512: still in the HMAC family.
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("test-secret-that-is-long-enough-for-hmac".as_bytes()),
        )
        .unwrap();

        assert!(codec.parse_access(&token).is_ok());
    }

    #[test]
    fn unsigned_token_is_rejected() {
        let codec = test_codec();

        // Hand-crafted `alg: none` token. No HMAC signature at all.
        let header = URL_SAFE.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let body = URL_SAFE.encode(br#"{"sub":"access","exp":99999999999}"#);
        let token = format!("{header}.{body}.");

        assert_matches!(codec.parse_access(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn non_access_kind_is_rejected() {
        let codec = test_codec();
        let claims = AccessClaims {
            sub: "refresh".to_string(),
            user_id: Uuid::new_v4(),
            ip: "10.0.0.1".to_string(),
            iat: chrono::Utc::now().timestamp(),
            exp: chrono::Utc::now().timestamp() + 900,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret("test-secret-that-is-long-enough-for-hmac".as_bytes()),
        )
        .unwrap();

        assert_matches!(codec.parse_access(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn refresh_token_with_wrong_length_is_rejected() {
        let codec = test_codec();

        let short = URL_SAFE.encode([0u8; REFRESH_SECRET_LEN + USER_ID_LEN - 1]);
        assert_matches!(codec.extract_user_id(&short), Err(AuthError::InvalidToken));

        let long = URL_SAFE.encode([0u8; REFRESH_SECRET_LEN + USER_ID_LEN + 1]);
        assert_matches!(codec.extract_user_id(&long), Err(AuthError::InvalidToken));
    }

    #[test]
    fn refresh_token_with_bad_encoding_is_rejected() {
        let codec = test_codec();
        assert_matches!(
            codec.extract_user_id("!!! not base64 !!!"),
            Err(AuthError::InvalidToken)
        );
    }
}
