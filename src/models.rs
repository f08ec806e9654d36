//! Response payloads served by the relay.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Figures shown on the overlay.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectedStats {
    pub kills: i64,
    pub deaths: i64,
    /// Kill/death ratio, two decimals.
    pub kd: f64,
    /// Only present when chicken tracking is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chicken_kills: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_chickens: Option<bool>,
}

/// Key listings that help spot fields the game never sends.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DebugKeys {
    pub player_match_stats_keys: Vec<String>,
    pub allplayers_me_match_stats_keys: Vec<String>,
}

/// Raw state dump for `/debug`.
#[derive(Debug, Clone, Serialize)]
pub struct DebugSnapshot {
    pub local_steamid: Option<String>,
    pub mode: &'static str,
    pub player: Value,
    pub stats: ProjectedStats,
    pub pushes_merged: u64,
    pub last_update: Option<String>,
    pub debug_keys: DebugKeys,
}
