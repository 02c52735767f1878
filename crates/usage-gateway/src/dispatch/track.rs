//! `/track` handler: validate one callback report and count it.
//!
//! Order per request is strict: method check, decode, user check, increment,
//! then the "counter incremented" record. Nothing is counted on rejection,
//! and every rejection is logged once at warn where it is detected.

use axum::{
    body,
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use usage_core::error::ClientCode;
use usage_core::TrackRequest;

use crate::app_state::AppState;

/// Bodies larger than this are rejected as unreadable.
pub const MAX_TRACK_BODY_BYTES: usize = 2 * 1024 * 1024;

pub async fn track(State(state): State<AppState>, req: Request) -> Response {
    let req_id = Uuid::now_v7();

    match record(&state, req_id, req).await {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(code) => reject(code),
    }
}

async fn record(state: &AppState, req_id: Uuid, req: Request) -> Result<(), ClientCode> {
    if req.method() != Method::POST {
        tracing::warn!(req_id = %req_id, method = %req.method(), "invalid method");
        return Err(ClientCode::MethodNotAllowed);
    }

    let bytes = body::to_bytes(req.into_body(), MAX_TRACK_BODY_BYTES)
        .await
        .map_err(|e| {
            tracing::warn!(req_id = %req_id, err = %e, "decode error");
            ClientCode::BadRequest
        })?;
    let payload = TrackRequest::decode(&bytes).map_err(|e| {
        tracing::warn!(req_id = %req_id, err = %e, "decode error");
        e.client_code()
    })?;
    let key = payload.label_key().map_err(|e| {
        tracing::warn!(req_id = %req_id, "missing user");
        e.client_code()
    })?;

    state.registry().increment(key);

    tracing::info!(
        req_id = %req_id,
        user = %payload.user,
        groups = %payload.groups,
        path = %payload.path,
        "counter incremented"
    );
    tracing::debug!(req_id = %req_id, payload = ?payload, "payload dump");
    Ok(())
}

fn reject(code: ClientCode) -> Response {
    let status =
        StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut resp = (status, code.message()).into_response();
    if code == ClientCode::MethodNotAllowed {
        resp.headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static("POST"));
    }
    resp
}
