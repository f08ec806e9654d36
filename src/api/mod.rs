//! HTTP surface of the relay
//!
//! - `POST` (any path) - GSI push, always answered `200 OK`
//! - `GET /stats` - projected K/D figures as JSON
//! - `GET /`, `GET /overlay` - OBS browser-source page
//! - `GET /debug` - raw state dump for troubleshooting

pub mod overlay;
pub mod routes;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;

use crate::config::RelayConfig;
use crate::middleware::request_logging;
use crate::state::StateStore;

pub use routes::{fallback, get_debug, get_overlay, get_stats, push_update};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StateStore>,
    pub config: Arc<RelayConfig>,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            store: Arc::new(StateStore::new()),
            config: Arc::new(config),
        }
    }
}

/// Build the relay router. Known routes also accept pushes so the game can
/// be pointed at any of them.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_overlay).post(push_update))
        .route("/overlay", get(get_overlay).post(push_update))
        .route("/overlay/", get(get_overlay).post(push_update))
        .route("/stats", get(get_stats).post(push_update))
        .route("/stats/", get(get_stats).post(push_update))
        .route("/debug", get(get_debug).post(push_update))
        .route("/debug/", get(get_debug).post(push_update))
        .fallback(fallback)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
