//! Application endpoints: status, info, echo, and the 404 fallback.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::{header, StatusCode, Uri},
    response::IntoResponse,
    Form, Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use vitals_core::error::VitalsError;

use crate::app_state::AppState;
use crate::clock::now_rfc3339;
use crate::error::ApiError;
use crate::obs::REQUESTS_TOTAL;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: String,
    pub environment: String,
    pub timestamp: String,
    pub request_count: u64,
    pub version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub application: String,
    pub version: String,
    pub environment: String,
    /// `rustc --version` of the toolchain that built the binary.
    pub rust_version: &'static str,
    pub platform: &'static str,
    pub arch: &'static str,
    pub pid: u32,
    pub uptime: f64,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoResponse {
    pub message: &'static str,
    pub received_data: Value,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub path: String,
    pub timestamp: String,
}

pub async fn root(State(state): State<AppState>) -> Json<StatusResponse> {
    let cfg = state.cfg();
    let request_count = state
        .metrics()
        .counter_value(REQUESTS_TOTAL, &[("route", "/"), ("method", "GET")])
        .unwrap_or(0);

    Json(StatusResponse {
        status: "ok",
        message: format!("{} is running!", cfg.app.name),
        environment: cfg.server.environment.clone(),
        timestamp: now_rfc3339(),
        request_count,
        version: cfg.app.version.clone(),
    })
}

pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    let cfg = state.cfg();
    Json(InfoResponse {
        application: cfg.app.name.clone(),
        version: cfg.app.version.clone(),
        environment: cfg.server.environment.clone(),
        rust_version: env!("VITALS_RUSTC_VERSION"),
        platform: std::env::consts::OS,
        arch: std::env::consts::ARCH,
        pid: std::process::id(),
        uptime: state.uptime().as_secs_f64(),
        timestamp: now_rfc3339(),
    })
}

/// Echo request body: JSON or urlencoded form. A missing body, or one with
/// any other content type, reads as `{}`.
#[derive(Debug)]
pub struct EchoBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for EchoBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mime = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase());

        match mime.as_deref() {
            Some("application/x-www-form-urlencoded") => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state).await?;
                let fields: Map<String, Value> = pairs
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect();
                Ok(Self(Value::Object(fields)))
            }
            Some(m) if m == "application/json" || m.ends_with("+json") => {
                let bytes = Bytes::from_request(req, state).await?;
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Self(Value::Object(Map::new())));
                }
                serde_json::from_slice(&bytes).map(Self).map_err(|e| {
                    ApiError(VitalsError::BadRequest(format!("invalid JSON body: {e}")))
                })
            }
            _ => Ok(Self(Value::Object(Map::new()))),
        }
    }
}

pub async fn echo(EchoBody(received_data): EchoBody) -> Json<EchoResponse> {
    Json(EchoResponse {
        message: "Echo endpoint trigger",
        received_data,
        timestamp: now_rfc3339(),
    })
}

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            status: "error",
            message: "Route not found",
            path: uri.path().to_string(),
            timestamp: now_rfc3339(),
        }),
    )
}
