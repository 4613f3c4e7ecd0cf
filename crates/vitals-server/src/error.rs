//! HTTP mapping for core errors and the catch-all panic response.

use std::any::Any;

use axum::{
    extract::rejection::{BytesRejection, FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use vitals_core::error::{ClientCode, VitalsError};

use crate::clock::now_rfc3339;

/// Core error surfaced to an HTTP client.
#[derive(Debug)]
pub struct ApiError(pub VitalsError);

impl From<VitalsError> for ApiError {
    fn from(e: VitalsError) -> Self {
        Self(e)
    }
}

impl ApiError {
    /// Extractor rejection: 413 stays 413, everything else is a bad request.
    fn rejected(status: StatusCode, text: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            return Self(VitalsError::PayloadTooLarge);
        }
        Self(VitalsError::BadRequest(text))
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::BadRequest | ClientCode::InvalidMetric | ClientCode::UnsupportedVersion => {
                StatusCode::BAD_REQUEST
            }
            ClientCode::Conflict => StatusCode::CONFLICT,
            ClientCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, %status, "request rejected");
        }

        let body = json!({
            "status": "error",
            "code": self.0.client_code().as_str(),
            "message": self.0.to_string(),
            "timestamp": now_rfc3339(),
        });
        (status, Json(body)).into_response()
    }
}

/// 500 body for a handler panic. The panic message is included only when
/// `expose` is set (development).
pub fn panic_response(err: Box<dyn Any + Send + 'static>, expose: bool) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "handler panicked");

    let mut body = json!({
        "status": "error",
        "message": "Internal server error",
        "timestamp": now_rfc3339(),
    });
    if expose {
        body["error"] = json!(detail);
    }
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
