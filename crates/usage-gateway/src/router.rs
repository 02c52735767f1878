//! Axum router wiring.
//!
//! `/track` accepts every method so the handler can answer non-POST with its
//! own 405 and log it under a request id.

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::timeout::TimeoutLayer;

use crate::{app_state::AppState, dispatch, ops};

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/track", any(dispatch::track))
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics));

    if state.cfg().pprof {
        router = ops::pprof::mount(router);
    }

    router
        .layer(TimeoutLayer::new(state.cfg().request_timeout))
        .with_state(state)
}
