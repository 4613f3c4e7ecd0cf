//! Shared error type across vitals crates.

use thiserror::Error;

use crate::health::Phase;
use crate::metrics::MetricKind;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Rejected metric write (bad delta, value, or name).
    InvalidMetric,
    /// Operation conflicts with current state.
    Conflict,
    /// Payload too large.
    PayloadTooLarge,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::InvalidMetric => "INVALID_METRIC",
            ClientCode::Conflict => "CONFLICT",
            ClientCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, VitalsError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum VitalsError {
    #[error("invalid delta: {0} (counters only increase)")]
    InvalidDelta(i64),
    #[error("non-finite gauge value: {0}")]
    NonFiniteValue(f64),
    #[error("invalid name: {0:?}")]
    InvalidName(String),
    #[error("duplicate label: {0}")]
    DuplicateLabel(String),
    #[error("metric {name} is a {existing}, not a {requested}")]
    KindMismatch {
        name: String,
        existing: MetricKind,
        requested: MetricKind,
    },
    #[error("invalid health transition: {from} -> {to}")]
    InvalidTransition { from: Phase, to: Phase },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl VitalsError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            VitalsError::InvalidDelta(_)
            | VitalsError::NonFiniteValue(_)
            | VitalsError::InvalidName(_)
            | VitalsError::DuplicateLabel(_) => ClientCode::InvalidMetric,
            VitalsError::KindMismatch { .. } | VitalsError::InvalidTransition { .. } => {
                ClientCode::Conflict
            }
            VitalsError::BadRequest(_) => ClientCode::BadRequest,
            VitalsError::PayloadTooLarge => ClientCode::PayloadTooLarge,
            VitalsError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            VitalsError::Internal(_) => ClientCode::Internal,
        }
    }
}
