//! Handlers for the `/auth` resource (login, refresh).

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::client_ip::ClientIp;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginParams {
    /// Opaque user identifier in canonical UUID form.
    #[serde(default)]
    pub user_id: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login?user_id=<uuid>
///
/// Issue a fresh token pair for the given user identifier, creating the user
/// on first sight and superseding any prior session.
pub async fn login(
    State(state): State<AppState>,
    ClientIp(origin_ip): ClientIp,
    Query(params): Query<LoginParams>,
) -> AppResult<Json<TokenResponse>> {
    let pair = state.manager.new_session(&params.user_id, &origin_ip).await?;

    Ok(Json(TokenResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for a new pair. The presented token is consumed
/// whether or not the exchange succeeds.
pub async fn refresh(
    State(state): State<AppState>,
    ClientIp(origin_ip): ClientIp,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<TokenResponse>> {
    let pair = state
        .manager
        .refresh_token(&input.refresh_token, &origin_ip)
        .await?;

    Ok(Json(TokenResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}
