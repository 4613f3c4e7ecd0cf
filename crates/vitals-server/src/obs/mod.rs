//! Observability: tracing setup, request counting, process gauges.
//!
//! Metric values live in the shared `MetricRegistry`; this module only
//! decides what gets written there and when.

pub mod sampler;
pub mod track;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogSection;

pub const REQUESTS_TOTAL: &str = "requests_total";
pub const UPTIME_SECONDS: &str = "uptime_seconds";
pub const MEMORY_USAGE_BYTES: &str = "memory_usage_bytes";
pub const HEALTH_ALIVE: &str = "health_alive";
pub const HEALTH_READY: &str = "health_ready";

/// `RUST_LOG` wins over `log.filter`.
pub fn init_tracing(log: &LogSection) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
