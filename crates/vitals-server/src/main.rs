//! vitals server binary.
//!
//! Endpoints:
//! - `GET  /`          status + request count
//! - `GET  /health`    liveness
//! - `GET  /ready`     readiness
//! - `GET  /api/info`  build / platform info
//! - `POST /api/echo`  JSON echo
//! - `GET  /metrics`   text exposition

use std::net::SocketAddr;

use vitals_core::error::{Result, VitalsError};
use vitals_server::{app_state::AppState, config, lifecycle, obs, router};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::load()?;
    obs::init_tracing(&cfg.log);

    let listen: SocketAddr = cfg
        .server
        .listen
        .parse()
        .map_err(|e| VitalsError::BadRequest(format!("server.listen: {e}")))?;

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| VitalsError::Internal(format!("bind {listen} failed: {e}")))?;

    tracing::info!(
        %listen,
        environment = %state.cfg().server.environment,
        pid = std::process::id(),
        "vitals-server starting"
    );
    for (method, path) in [
        ("GET", "/"),
        ("GET", "/health"),
        ("GET", "/ready"),
        ("GET", "/api/info"),
        ("POST", "/api/echo"),
        ("GET", "/metrics"),
    ] {
        tracing::info!("  {method:<4} http://{listen}{path}");
    }

    lifecycle::mark_started(&state);

    axum::serve(listener, app)
        .with_graceful_shutdown(lifecycle::shutdown_signal(state.clone()))
        .await
        .map_err(|e| VitalsError::Internal(format!("server failed: {e}")))?;

    lifecycle::finish(&state);
    Ok(())
}
