//! CS2 GSI relay
//!
//! Point the game's `gamestate_integration_*.cfg` at this server, then add
//! `http://localhost:<port>/overlay` as an OBS browser source.
//!
//! Environment:
//!   CS2_GSI_PORT - Listen port (default: 3002)
//!   CS2_GSI_HOST - Listen address (default: 0.0.0.0)
//!   CS2_GSI_IGNORE_SPECTATOR - 1 follows the spectated player, 0 pins the local one (default: 1)
//!   CS2_GSI_TRACK_CHICKENS - Report chicken kills (default: 0)

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gsi_relay::{
    config::{load_env, Args, RelayConfig},
    create_router,
    state::IdentityMode,
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    init_tracing();

    let config = RelayConfig::from(Args::parse());
    let addr = config.bind_addr();
    let port = config.port;

    match config.mode {
        IdentityMode::PassThrough => info!(
            "Mode: stats of whoever the game reports (teammate while spectating). \
             Set CS2_GSI_IGNORE_SPECTATOR=0 to pin the local player"
        ),
        IdentityMode::Strict => info!("Mode: local player only, spectated players ignored"),
    }
    if config.track_chickens {
        info!("Chicken kill tracking enabled");
    }

    let app = create_router(AppState::new(config));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("CS2 GSI server: http://localhost:{port}/");
    info!("Overlay for OBS: http://localhost:{port}/overlay");
    info!("Debug snapshot: http://localhost:{port}/debug");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gsi_relay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
