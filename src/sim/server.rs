use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::dataset::Dataset;
use super::session::{run_retro, SimulationSession};
use crate::error::AppError;
use crate::feed::StreamMode;
use crate::model::retro::RetroResponse;

/// Shared state for the simulation server: the loaded dataset and the
/// cadence ticks are pushed at.
#[derive(Debug)]
pub struct SimState {
    dataset: Dataset,
    tick_interval: Duration,
}

impl SimState {
    pub fn new(dataset: Dataset, tick_interval: Duration) -> Self {
        Self {
            dataset,
            tick_interval,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamQuery {
    mode: Option<String>,
}

pub fn build_router(state: Arc<SimState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(api_health))
        .route("/api/metadata", get(api_metadata))
        .route("/api/preview", get(api_preview))
        .route("/api/retro", get(api_retro))
        .route("/ws/stream", get(ws_stream))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(state: Arc<SimState>, bind_addr: &str) -> Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(addr = %bind_addr, "Simulation server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Simulation server shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    tracing::info!("Ctrl+C received, shutting down");
}

async fn api_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn api_metadata(State(state): State<Arc<SimState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "rows": state.dataset.len(),
        "grid_fields": ["timestamp", "spot_price", "grid_load_mw"],
        "weather_fields": ["timestamp", "temp_c"],
        "traffic_fields": ["timestamp", "congestion_index"],
    }))
}

async fn api_preview(State(state): State<Arc<SimState>>) -> impl IntoResponse {
    let limit = state.dataset.len().min(3);
    Json(serde_json::json!({
        "grid": &state.dataset.grid[..limit],
        "weather": &state.dataset.weather[..limit],
        "traffic": &state.dataset.traffic[..limit],
    }))
}

async fn api_retro(State(state): State<Arc<SimState>>) -> impl IntoResponse {
    Json(RetroResponse {
        summary: run_retro(&state.dataset),
    })
}

async fn ws_stream(
    ws: WebSocketUpgrade,
    Query(query): Query<StreamQuery>,
    State(state): State<Arc<SimState>>,
) -> impl IntoResponse {
    // Lenient on the server side: an unknown mode falls back to sim so a
    // misconfigured client still gets a stream.
    let mode = match query.mode.as_deref() {
        None => StreamMode::Sim,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(mode = raw, "Unknown stream mode requested, serving sim");
            StreamMode::Sim
        }),
    };

    ws.on_upgrade(move |socket| async move {
        if let Err(e) = stream_session(socket, state, mode).await {
            tracing::debug!(error = %e, "Stream session ended");
        }
    })
}

async fn stream_session(
    mut socket: WebSocket,
    state: Arc<SimState>,
    mode: StreamMode,
) -> Result<(), AppError> {
    tracing::info!(mode = %mode, "Stream session opened");
    let mut session = SimulationSession::new(mode);

    for idx in 0..state.dataset.len() {
        let tick = session.step(
            &state.dataset.grid[idx],
            &state.dataset.weather[idx],
            &state.dataset.traffic[idx],
        );
        let payload = serde_json::to_string(&tick)?;
        socket
            .send(Message::Text(payload.into()))
            .await
            .map_err(|e| AppError::WebSocket(e.to_string()))?;
        tokio::time::sleep(state.tick_interval).await;
    }

    tracing::info!(mode = %mode, "Dataset exhausted, closing stream");
    Ok(())
}
