//! CS2 GSI relay
//!
//! Receives Counter-Strike 2 Game State Integration pushes, keeps the merged
//! state in memory and serves K/D figures as JSON plus an OBS overlay page.

pub mod api;
pub mod config;
pub mod middleware;
pub mod models;
pub mod state;
pub mod stats;

pub use api::{create_router, AppState};
pub use config::{Args, RelayConfig};
