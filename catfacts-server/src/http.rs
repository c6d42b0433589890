//! Cat Facts HTTP host
//!
//! Axum server that receives skill request envelopes and returns response
//! envelopes. Each endpoint has a thin axum handler that delegates to an inner
//! function, so the logic is testable without axum dispatch machinery.
//!
//! Endpoints:
//! - POST /        — skill endpoint (request envelope in, response envelope out)
//! - GET  /health  — DB status and cached fact count
//! - GET  /version — server version info

use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use catfacts_core::skill::{SkillRequest, SkillResponse};
use catfacts_core::CatFactsConfig;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::context::SkillContext;

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub pool: PgPool,
    pub context: Arc<SkillContext>,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/", post(skill_handler))
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    state: Arc<HttpState>,
    config: &CatFactsConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.http.host, config.http.port);

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Cat Facts skill endpoint listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Inner (directly testable) functions
// ============================================================================

/// Inner skill call — always a valid envelope, never an HTTP error.
pub async fn skill_inner(context: &SkillContext, request: SkillRequest) -> SkillResponse {
    crate::router::handle_request(&request, context).await
}

/// Inner health check — queries DB and returns (status_code, json_body).
pub async fn health_inner(pool: &PgPool, context: &SkillContext) -> (StatusCode, serde_json::Value) {
    match catfacts_core::db::health_check(pool).await {
        Ok(pg_ver) => (
            StatusCode::OK,
            serde_json::json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "postgresql": pg_ver,
                "store": context.store().name(),
                "fact_count": context.fact_count(),
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            serde_json::json!({
                "status": "unhealthy",
                "error": e.to_string(),
                "fact_count": context.fact_count(),
            }),
        ),
    }
}

/// Inner version — returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "catfacts/1",
    })
}

// ============================================================================
// Axum handler wrappers (thin — delegate to inner functions)
// ============================================================================

/// Any JSON body is accepted; envelopes that do not decode are handled as unknown requests.
pub async fn skill_handler(
    State(state): State<Arc<HttpState>>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    let request = SkillRequest::from_value(body);
    (StatusCode::OK, Json(skill_inner(&state.context, request).await))
}

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state.pool, &state.context).await;
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}
