//! Operational HTTP endpoints.
//!
//! - `/health`  : liveness (503 once stopped)
//! - `/ready`   : readiness (503 while starting, not ready, or draining)
//! - `/metrics` : text exposition of the shared registry

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::app_state::AppState;
use crate::clock::now_rfc3339;
use crate::error::ApiError;
use crate::obs::sampler::{self, ProcessStats};

pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Serialize)]
struct MemoryUsage {
    #[serde(skip_serializing_if = "Option::is_none")]
    rss: Option<u64>,
    #[serde(rename = "virtual", skip_serializing_if = "Option::is_none")]
    virtual_size: Option<u64>,
}

impl From<ProcessStats> for MemoryUsage {
    fn from(s: ProcessStats) -> Self {
        Self {
            rss: s.rss_bytes,
            virtual_size: s.virtual_bytes,
        }
    }
}

pub async fn health(State(state): State<AppState>) -> Response {
    let alive = state.health().is_alive();
    let (status, label) = if alive {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    let body = json!({
        "status": label,
        "uptime": state.uptime().as_secs_f64(),
        "timestamp": now_rfc3339(),
        "memory": MemoryUsage::from(ProcessStats::read()),
        "pid": std::process::id(),
    });
    (status, Json(body)).into_response()
}

pub async fn ready(State(state): State<AppState>) -> Response {
    let snap = state.health().snapshot();
    if snap.phase.is_ready() {
        return (
            StatusCode::OK,
            Json(json!({ "status": "ready", "timestamp": now_rfc3339() })),
        )
            .into_response();
    }

    let mut body = json!({
        "status": "not_ready",
        "phase": snap.phase.as_str(),
        "timestamp": now_rfc3339(),
    });
    if let Some(reason) = snap.reason {
        body["reason"] = json!(reason);
    }
    (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
}

pub async fn metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
    sampler::sample_process(&state)?;
    let body = state.metrics().render();

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        body,
    )
        .into_response())
}
