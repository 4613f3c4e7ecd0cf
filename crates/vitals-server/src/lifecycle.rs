//! Startup readiness and cooperative shutdown.
//!
//! Shutdown order: readiness off (`Draining`), optional drain delay so load
//! balancers observe the failing probe, listener closes and in-flight
//! requests finish, then `Stopped`.

use std::time::Duration;

use crate::app_state::AppState;

/// Mark the service ready once startup work succeeded.
pub fn mark_started(state: &AppState) {
    match state.health().mark_ready() {
        Ok(()) => tracing::info!(phase = %state.health().phase(), "service ready"),
        Err(e) => tracing::warn!(error = %e, "mark_ready rejected"),
    }
}

/// Resolves when the server should stop accepting connections.
/// Passed to `axum::serve(..).with_graceful_shutdown`.
pub async fn shutdown_signal(state: AppState) {
    wait_for_signal().await;
    begin_drain(&state).await;
}

/// Withdraw readiness and wait out the configured drain delay.
pub async fn begin_drain(state: &AppState) {
    match state.health().begin_shutdown() {
        Ok(()) => tracing::info!("readiness withdrawn, draining"),
        Err(e) => tracing::warn!(error = %e, "begin_shutdown rejected"),
    }

    let delay = state.cfg().shutdown.drain_delay_ms;
    if delay > 0 {
        tracing::info!(delay_ms = delay, "waiting before closing listener");
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
}

/// Called after the server future returns (all in-flight requests done).
pub fn finish(state: &AppState) {
    match state.health().finalize_shutdown() {
        Ok(()) => tracing::info!("shutdown complete"),
        Err(e) => tracing::warn!(error = %e, "finalize_shutdown rejected"),
    }
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use vitals_core::Phase;

    #[tokio::test]
    async fn drain_then_finish() {
        let state = AppState::new(ServiceConfig::default()).unwrap();
        mark_started(&state);
        assert!(state.health().is_ready());

        begin_drain(&state).await;
        assert_eq!(state.health().phase(), Phase::Draining);
        assert!(state.health().is_alive());

        finish(&state);
        assert_eq!(state.health().phase(), Phase::Stopped);
    }
}
