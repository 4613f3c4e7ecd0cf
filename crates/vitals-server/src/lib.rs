//! vitals server library entry.
//!
//! Wires the core registry and health state into an axum service exposing
//! status, probe, info, echo, and metrics endpoints. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod clock;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod obs;
pub mod ops;
pub mod router;
