//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness (204, regardless of registry state)
//! - `/metrics` : Prometheus text format
//! - `/debug/pprof/*` : process introspection, only when enabled

pub mod pprof;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;
use crate::obs::metrics::EXPOSITION_CONTENT_TYPE;

pub async fn healthz() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.registry().render();

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        body,
    )
        .into_response()
}
