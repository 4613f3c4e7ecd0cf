//! Axum router wiring.
//!
//! Layer order (outermost first): access log, CORS, security headers,
//! panic catcher, body limit, then the routes. Request counting is a
//! per-route `route_layer`: unknown paths and unsupported methods fall
//! through to the JSON 404 without touching the registry.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    middleware,
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{api, app_state::AppState, error, obs, ops};

pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", counted(&state, get(api::root)))
        .route("/health", counted(&state, get(ops::health)))
        .route("/ready", counted(&state, get(ops::ready)))
        .route("/metrics", counted(&state, get(ops::metrics)))
        .route("/api/info", counted(&state, get(api::info)))
        .route("/api/echo", counted(&state, post(api::echo)));

    with_service_layers(routes, state)
}

/// Count requests the route actually serves; a method the route does not
/// handle gets the 404 envelope instead of axum's empty 405.
fn counted(state: &AppState, route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            obs::track::count_requests,
        ))
        .fallback(api::not_found)
}

/// Attach the 404 fallback and the shared middleware stack to `routes`.
pub fn with_service_layers(routes: Router<AppState>, state: AppState) -> Router {
    let expose_errors = state.cfg().is_development();
    let max_body = state.cfg().server.max_body_bytes;

    routes
        .fallback(api::not_found)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CatchPanicLayer::custom(
            move |err: Box<dyn std::any::Any + Send + 'static>| {
                error::panic_response(err, expose_errors)
            },
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(cors_layer())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
