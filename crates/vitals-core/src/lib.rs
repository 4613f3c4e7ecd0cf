//! vitals core: process-health and metrics exposition primitives.
//!
//! This crate defines the metric registry (counters and gauges rendered in a
//! stable text exposition format) and the liveness/readiness state machine
//! consulted by probe handlers. It carries no transport, runtime, or logging
//! dependencies; every operation is in-memory and completes synchronously.
//!
//! # Guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths surface as `VitalsError`/`Result`, and a rejected call
//! never mutates registry or health state.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod health;
pub mod metrics;

/// Shared result type.
pub use error::{Result, VitalsError};
pub use health::{HealthSnapshot, HealthState, Phase};
pub use metrics::{MetricKind, MetricRegistry, MetricValue, Sample, Snapshot};
