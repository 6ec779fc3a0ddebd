//! Shared helpers for HTTP-level integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use gatehouse_api::config::ServerConfig;
use gatehouse_api::routes;
use gatehouse_api::state::AppState;
use gatehouse_core::hashing::Argon2Hasher;
use gatehouse_core::{SessionManager, TokenCodec, TokenConfig};
use gatehouse_notify::AlertQueue;

/// Build a test `ServerConfig` with safe defaults and a known signing secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 10,
        shutdown_timeout_secs: 30,
        token: TokenConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_ttl_mins: 15,
            refresh_ttl_days: 30,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses. The alert channel's receiving half
/// is dropped: dispatched warnings are silently discarded.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let (alert_queue, _alert_rx) = AlertQueue::new();

    let store = Arc::new(gatehouse_db::PgAuthStore::new(pool.clone()));
    let manager = Arc::new(SessionManager::new(
        store.clone(),
        store,
        Arc::new(Argon2Hasher),
        Arc::new(alert_queue),
        TokenCodec::new(config.token.clone()),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config),
        manager,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// GET the given URI.
#[allow(dead_code)]
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// POST with an empty body, presenting the given client IP via
/// `X-Forwarded-For`.
#[allow(dead_code)]
pub async fn post_from_ip(app: Router, uri: &str, ip: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("x-forwarded-for", ip)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// POST a JSON body, presenting the given client IP via `X-Forwarded-For`.
#[allow(dead_code)]
pub async fn post_json_from_ip(
    app: Router,
    uri: &str,
    ip: &str,
    body: serde_json::Value,
) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("x-forwarded-for", ip)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body and parse it as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
