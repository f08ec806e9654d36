//! Relay configuration
//!
//! Every option can come from the command line or from the environment
//! (`.env` files included), matching how the game-side config file expects
//! the relay to be reachable.

use std::path::Path;

use clap::{builder::BoolishValueParser, ArgAction, Parser};

use crate::state::IdentityMode;

pub const DEFAULT_PORT: u16 = 3002;

#[derive(Parser, Debug, Clone)]
#[command(name = "gsi-relay")]
#[command(about = "CS2 Game State Integration relay - serves K/D stats and an OBS overlay")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "CS2_GSI_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the game pushes to and the overlay is served from
    #[arg(long, env = "CS2_GSI_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Follow whoever the game focuses on, spectated teammates included.
    /// Set to 0/false to only ever report the first player seen.
    #[arg(
        long,
        env = "CS2_GSI_IGNORE_SPECTATOR",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub ignore_spectator: bool,

    /// Report chicken kills alongside K/D
    #[arg(
        long,
        env = "CS2_GSI_TRACK_CHICKENS",
        default_value = "false",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub track_chickens: bool,
}

/// Resolved settings shared with request handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub mode: IdentityMode,
    pub track_chickens: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            mode: IdentityMode::PassThrough,
            track_chickens: false,
        }
    }
}

impl From<Args> for RelayConfig {
    fn from(args: Args) -> Self {
        let mode = if args.ignore_spectator {
            IdentityMode::PassThrough
        } else {
            IdentityMode::Strict
        };
        Self {
            host: args.host,
            port: args.port,
            mode,
            track_chickens: args.track_chickens,
        }
    }
}

impl RelayConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load `.env` from the working directory, then from the crate directory.
pub fn load_env() {
    let _ = dotenv::dotenv();

    let local = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if local.exists() {
        let _ = dotenv::from_path(&local);
    }
}
