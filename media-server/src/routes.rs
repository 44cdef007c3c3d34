//! # Route Handlers
//!
//! Thin handlers over the auth gate, the catalog, and the range streamer.
//! Authorization always runs before any file I/O; a request with no valid
//! session never touches the disk.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde_json::json;
use tracing::{debug, warn};

use core_auth::{token_from_cookie_header, AccessDecision, Claims};

use crate::range::{self, RangeOutcome};
use crate::state::AppState;

const NO_STORE: &str = "private, max-age=0, no-store";
const AUDIO_MIME: &str = "audio/mpeg";

/// Pull the session credential off a request: the session cookie, or an
/// equivalent `Authorization: Bearer` header.
fn credential(state: &AppState, headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok());
    if let Some(token) = token_from_cookie_header(cookie_header, &state.cookie_name) {
        return Some(token);
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_owned)
}

fn check(state: &AppState, headers: &HeaderMap) -> AccessDecision {
    let token = credential(state, headers);
    state.gate.check(token.as_deref(), Utc::now())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::CACHE_CONTROL, NO_STORE)],
        Json(json!({ "error": "Not authorized" })),
    )
        .into_response()
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}

/// `GET /protected-media/{slug}` — session-gated, range-aware track bytes.
pub async fn protected_media(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    // Authorization first; unauthorized requests cause no file I/O at all.
    if !check(&state, &headers).is_authorized() {
        debug!(slug, "unauthorized media request");
        return unauthorized();
    }

    // The slug table is the only name→path indirection; unknown or
    // path-shaped slugs miss here. Unreleased material is withheld even
    // though a locator may exist for it.
    let Some(track) = state.catalog.resolve(&slug).filter(|t| t.playable()) else {
        return not_found("Track not found");
    };
    let Some(locator) = track.locator.as_deref() else {
        return not_found("Track not found");
    };

    let path = state.media_root.join(locator);
    let total = match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => meta.len(),
        _ => {
            warn!(slug, "catalog entry points at a missing file");
            return not_found("File missing");
        }
    };

    let range_header = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok());

    match range::interpret(range_header, total) {
        RangeOutcome::Unsatisfiable => Response::builder()
            .status(StatusCode::RANGE_NOT_SATISFIABLE)
            .header(header::CONTENT_RANGE, format!("bytes */{total}"))
            .header(header::CACHE_CONTROL, NO_STORE)
            .body(Body::empty())
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        RangeOutcome::Partial(span) => {
            let stream = match range::stream_file_span(&path, span.start, span.len()).await {
                Ok(stream) => stream,
                Err(e) => {
                    warn!(slug, error = %e, "failed to open range");
                    return not_found("File missing");
                }
            };
            Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", span.start, span.end, total),
                )
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CONTENT_LENGTH, span.len())
                .header(header::CONTENT_TYPE, AUDIO_MIME)
                .header(header::CACHE_CONTROL, NO_STORE)
                .body(Body::from_stream(stream))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        RangeOutcome::Full => {
            let stream = match range::stream_file_span(&path, 0, total).await {
                Ok(stream) => stream,
                Err(e) => {
                    warn!(slug, error = %e, "failed to open asset");
                    return not_found("File missing");
                }
            };
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_LENGTH, total)
                .header(header::CONTENT_TYPE, AUDIO_MIME)
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CACHE_CONTROL, NO_STORE)
                .body(Body::from_stream(stream))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

/// `GET /session/whoami` — credential status. Always 200, never an error:
/// the player page polls this to decide whether to show the gate.
pub async fn whoami(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = credential(&state, &headers);
    if token.is_none() {
        return Json(json!({ "authed": false })).into_response();
    }
    match state.gate.check(token.as_deref(), Utc::now()) {
        AccessDecision::Authorized(claims) => {
            Json(json!({ "authed": true, "payload": payload_json(&claims) })).into_response()
        }
        AccessDecision::Denied(reason) => {
            Json(json!({ "authed": false, "reason": reason.as_str() })).into_response()
        }
    }
}

/// `GET /session/me` — authenticated identity, 401 without a valid session.
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match check(&state, &headers) {
        AccessDecision::Authorized(claims) => {
            Json(json!({ "ok": true, "user": claims.sub })).into_response()
        }
        AccessDecision::Denied(_) => {
            (StatusCode::UNAUTHORIZED, Json(json!({ "ok": false }))).into_response()
        }
    }
}

fn payload_json(claims: &Claims) -> serde_json::Value {
    // Claims serialize back to the original payload shape, extras included.
    serde_json::to_value(claims).unwrap_or_else(|_| json!({}))
}
