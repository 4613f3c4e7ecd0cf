//! Shared application state for the vitals server.
//!
//! One registry and one health state per process; handlers receive cheap
//! clones of this struct through axum's `State` extractor.

use std::sync::Arc;
use std::time::{Duration, Instant};

use vitals_core::error::Result;
use vitals_core::{HealthState, MetricRegistry};

use crate::config::ServiceConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<MetricRegistry>,
    health: Arc<HealthState>,
}

struct AppStateInner {
    cfg: ServiceConfig,
    started: Instant,
}

impl AppState {
    /// Build application state. Health starts in `Starting`; the caller marks
    /// it ready once the listener is bound.
    pub fn new(cfg: ServiceConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                started: Instant::now(),
            }),
            metrics: Arc::new(MetricRegistry::new()),
            health: Arc::new(HealthState::new()),
        })
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &MetricRegistry {
        &self.metrics
    }

    pub fn health(&self) -> &HealthState {
        &self.health
    }

    pub fn uptime(&self) -> Duration {
        self.inner.started.elapsed()
    }
}
