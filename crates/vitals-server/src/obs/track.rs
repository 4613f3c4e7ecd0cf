//! Request counting middleware.

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;
use crate::obs::REQUESTS_TOTAL;

/// Increment `requests_total{route,method}` before the handler runs, so a
/// handler reading the counter sees its own request.
///
/// Installed with `MethodRouter::route_layer`, so only a method the route
/// handles is counted; both labels therefore come from a fixed set and the
/// route label is the path template, never the raw URI.
pub async fn count_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    let method = req.method().as_str().to_owned();

    if let Err(e) = state
        .metrics()
        .increment(REQUESTS_TOTAL, &[("route", route.as_str()), ("method", method.as_str())])
    {
        tracing::warn!(error = %e, %route, %method, "request counter update failed");
    }

    next.run(req).await
}
