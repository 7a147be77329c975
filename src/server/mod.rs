//! HTTP server and request handlers.
//!
//! One aggregation endpoint (`POST /`) plus a liveness probe
//! (`GET /healthz`). The snapshot is shared read-only across handlers;
//! aggregation is recomputed fresh on every request.

use crate::analysis::aggregate_regions;
use crate::config::Config;
use crate::models::{AggregateRequest, AggregateResponse, TelemetrySnapshot};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

/// Shared application state injected into handlers.
pub struct AppState {
    /// The telemetry snapshot, immutable for the process lifetime.
    pub snapshot: Arc<TelemetrySnapshot>,
    /// When the server started, for the health probe.
    pub started_at: Instant,
}

/// Liveness probe payload.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    /// Number of telemetry records currently served.
    pub records: usize,
}

/// Build the application router.
pub fn build_router(state: Arc<AppState>, enable_cors: bool) -> Router {
    let mut router = Router::new()
        .route("/", post(aggregate_handler))
        .route("/healthz", get(health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // Browser clients POST from arbitrary origins.
    if enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

/// Bind and serve until ctrl-c.
pub async fn serve(config: &Config, snapshot: Arc<TelemetrySnapshot>) -> Result<()> {
    let state = Arc::new(AppState {
        snapshot,
        started_at: Instant::now(),
    });
    let router = build_router(state, config.server.cors);

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.server.bind))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

/// `POST /` — aggregate metrics for the requested regions.
///
/// Always replies with HTTP 200 for a well-formed body: either the
/// region-to-metrics map, or the data-unavailable error payload when
/// the snapshot is empty. Malformed bodies are rejected by the `Json`
/// extractor before this handler runs.
pub async fn aggregate_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AggregateRequest>,
) -> Json<AggregateResponse> {
    if state.snapshot.is_empty() {
        return Json(AggregateResponse::data_unavailable());
    }

    debug!(
        "Aggregating {} region(s) with threshold {}ms",
        request.regions.len(),
        request.threshold_ms
    );

    let metrics = aggregate_regions(&state.snapshot, &request.regions, request.threshold_ms);
    Json(AggregateResponse::Metrics(metrics))
}

/// `GET /healthz` — simple liveness probe.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        records: state.snapshot.len(),
    })
}
