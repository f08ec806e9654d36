//! Route handlers.
//!
//! None of these fail: the game has no way to react to an error, and the
//! overlay should keep showing zeros rather than break.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Json, Response},
};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{overlay::OVERLAY_HTML, AppState};
use crate::models::ProjectedStats;
use crate::stats;

fn ok_response() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain")],
        "OK",
    )
        .into_response()
}

/// Parse and fold one push into the store. Problems are logged, never returned.
fn ingest_push(state: &AppState, path: &str, body: Result<Bytes, BytesRejection>) {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            warn!(path, error = %e, "Failed to read GSI push body");
            return;
        }
    };
    debug!(path, bytes = body.len(), "GSI push received");

    let update: Value = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(path, bytes = body.len(), error = %e, "Malformed GSI payload dropped");
            return;
        }
    };

    let outcome = state.store.ingest(update, state.config.mode);
    if !outcome.merged {
        warn!(path, "GSI payload is not a JSON object, dropped");
        return;
    }
    if let Some(steamid) = &outcome.resolution.captured {
        info!(%steamid, "Local player SteamID captured");
    }
    if let Some(steamid) = &outcome.resolution.stripped_focus {
        debug!(%steamid, "Spectated player section ignored");
    }

    let ProjectedStats { kills, deaths, .. } =
        stats::project(&state.store, state.config.track_chickens);
    debug!(kills, deaths, "Stats after push");
}

/// Accept a GSI push on any route.
pub async fn push_update(
    State(state): State<AppState>,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    ingest_push(&state, uri.path(), body);
    ok_response()
}

/// Current K/D figures.
pub async fn get_stats(State(state): State<AppState>) -> Json<ProjectedStats> {
    Json(stats::project(&state.store, state.config.track_chickens))
}

pub async fn get_overlay() -> Html<&'static str> {
    Html(OVERLAY_HTML)
}

/// Pretty-printed state dump.
pub async fn get_debug(State(state): State<AppState>) -> Response {
    let snapshot =
        stats::debug_snapshot(&state.store, state.config.mode, state.config.track_chickens);

    match serde_json::to_string_pretty(&snapshot) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to serialize debug snapshot");
            (StatusCode::OK, Json(serde_json::json!({}))).into_response()
        }
    }
}

/// Pushes to unknown paths are still accepted; anything else is 404.
pub async fn fallback(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    if method == Method::POST {
        ingest_push(&state, uri.path(), body);
        return ok_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
