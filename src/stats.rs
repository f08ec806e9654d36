//! Stats projection
//!
//! Reduces the cumulative GSI state to the handful of figures the overlay
//! shows. The local player's record is looked up in `allplayers` first so a
//! spectated teammate in the `player` slot does not leak onto the overlay
//! whenever the game reports every player.

use serde_json::{Map, Value};

use crate::models::{DebugKeys, DebugSnapshot, ProjectedStats};
use crate::state::identity::{IdentityMode, ALL_PLAYERS_KEY, FOCUSED_KEY};
use crate::state::{StateStore, StateView};

const MATCH_STATS_KEY: &str = "match_stats";

/// Map name substrings where chickens roam.
pub const CHICKEN_MAPS: &[&str] = &["italy", "inferno", "dust", "aztec", "cbble", "ancient"];

/// Integer view of a loosely typed GSI field; anything unusable is zero.
pub fn coerce_int(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        Some(Value::Bool(b)) => i64::from(*b),
        _ => 0,
    }
}

/// `kills / deaths`, or plain kills with no deaths, rounded to two decimals.
pub fn kd_ratio(kills: i64, deaths: i64) -> f64 {
    let ratio = if deaths > 0 {
        kills as f64 / deaths as f64
    } else {
        kills as f64
    };
    (ratio * 100.0).round() / 100.0
}

pub fn is_chicken_map(map_name: &str) -> bool {
    let lower = map_name.to_lowercase();
    CHICKEN_MAPS.iter().any(|m| lower.contains(m))
}

pub fn shows_chickens(map_name: Option<&str>, chicken_kills: i64) -> bool {
    chicken_kills != 0 || map_name.is_some_and(is_chicken_map)
}

/// The local player's entry in `allplayers`, by exact key then by numeric value.
fn local_player_record<'a>(view: &StateView<'a>) -> Option<&'a Map<String, Value>> {
    let id = view.local_identity?;
    let all = view.object(&[ALL_PLAYERS_KEY])?;

    if let Some(record) = all.get(id) {
        return record.as_object();
    }

    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let wanted = id.parse::<u64>().ok()?;
    all.iter()
        .find(|(key, _)| key.trim().parse::<u64>().ok() == Some(wanted))
        .and_then(|(_, record)| record.as_object())
}

fn focused_match_stats<'a>(view: &StateView<'a>) -> Option<&'a Map<String, Value>> {
    view.object(&[FOCUSED_KEY, MATCH_STATS_KEY])
}

/// Match stats to report: the local record when it has any, else the focused slot.
fn resolve_match_stats<'a>(view: &StateView<'a>) -> Option<&'a Map<String, Value>> {
    local_player_record(view)
        .and_then(|record| record.get(MATCH_STATS_KEY))
        .and_then(Value::as_object)
        .filter(|stats| !stats.is_empty())
        .or_else(|| focused_match_stats(view))
}

/// Compute stats from an already-locked view.
pub fn project_view(view: &StateView<'_>, track_chickens: bool) -> ProjectedStats {
    let stats = resolve_match_stats(view);
    let field = |name: &str| coerce_int(stats.and_then(|s| s.get(name)));

    let kills = field("kills");
    let deaths = field("deaths");

    let (chicken_kills, show_chickens) = if track_chickens {
        let chickens = field("chicken_kills");
        let map_name = view.get(&["map", "name"]).and_then(Value::as_str);
        (Some(chickens), Some(shows_chickens(map_name, chickens)))
    } else {
        (None, None)
    };

    ProjectedStats {
        kills,
        deaths,
        kd: kd_ratio(kills, deaths),
        chicken_kills,
        show_chickens,
    }
}

pub fn project(store: &StateStore, track_chickens: bool) -> ProjectedStats {
    store.read(|view| project_view(&view, track_chickens))
}

fn keys_of(map: Option<&Map<String, Value>>) -> Vec<String> {
    map.map(|m| m.keys().cloned().collect()).unwrap_or_default()
}

/// Everything `/debug` shows, captured under a single lock.
pub fn debug_snapshot(store: &StateStore, mode: IdentityMode, track_chickens: bool) -> DebugSnapshot {
    store.read(|view| {
        let player = view
            .get(&[FOCUSED_KEY])
            .filter(|p| p.is_object())
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        let mine = local_player_record(&view)
            .and_then(|record| record.get(MATCH_STATS_KEY))
            .and_then(Value::as_object);
        let keys = DebugKeys {
            player_match_stats_keys: keys_of(focused_match_stats(&view)),
            allplayers_me_match_stats_keys: keys_of(mine),
        };
        DebugSnapshot {
            local_steamid: view.local_identity.map(str::to_string),
            mode: mode.as_str(),
            player,
            stats: project_view(&view, track_chickens),
            pushes_merged: view.pushes_merged,
            last_update: view.last_merge_at.map(|t| t.to_rfc3339()),
            debug_keys: keys,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_with(mode: IdentityMode, pushes: &[Value]) -> StateStore {
        let store = StateStore::new();
        for push in pushes {
            store.ingest(push.clone(), mode);
        }
        store
    }

    #[test]
    fn test_kd_ratio() {
        assert_eq!(kd_ratio(10, 4), 2.5);
        assert_eq!(kd_ratio(5, 0), 5.0);
        assert_eq!(kd_ratio(0, 0), 0.0);
        assert_eq!(kd_ratio(2, 3), 0.67);
        assert_eq!(kd_ratio(1, 8), 0.13);
    }

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_int(Some(&json!(7))), 7);
        assert_eq!(coerce_int(Some(&json!(" 12 "))), 12);
        assert_eq!(coerce_int(Some(&json!(3.9))), 3);
        assert_eq!(coerce_int(Some(&json!("abc"))), 0);
        assert_eq!(coerce_int(Some(&json!("1.5"))), 0);
        assert_eq!(coerce_int(Some(&json!(null))), 0);
        assert_eq!(coerce_int(Some(&json!({"k": 1}))), 0);
        assert_eq!(coerce_int(Some(&json!(true))), 1);
        assert_eq!(coerce_int(None), 0);
    }

    #[test]
    fn test_empty_state_projects_zeros() {
        let store = StateStore::new();
        assert_eq!(project(&store, false), ProjectedStats::default());

        let stats = project(&store, true);
        assert_eq!(stats.chicken_kills, Some(0));
        assert_eq!(stats.show_chickens, Some(false));
    }

    #[test]
    fn test_non_numeric_fields_project_zeros() {
        let store = store_with(
            IdentityMode::PassThrough,
            &[json!({"player": {"match_stats": {"kills": "lots", "deaths": [1]}}})],
        );
        let stats = project(&store, false);
        assert_eq!((stats.kills, stats.deaths, stats.kd), (0, 0, 0.0));
    }

    #[test]
    fn test_focused_slot_used_without_allplayers() {
        let store = store_with(
            IdentityMode::PassThrough,
            &[json!({"player": {"steamid": "1", "match_stats": {"kills": 10, "deaths": 4}}})],
        );
        let stats = project(&store, false);
        assert_eq!((stats.kills, stats.deaths, stats.kd), (10, 4, 2.5));
    }

    #[test]
    fn test_allplayers_record_preferred_over_focused_slot() {
        let store = store_with(
            IdentityMode::PassThrough,
            &[
                json!({"player": {"steamid": "1", "match_stats": {"kills": 1}}}),
                json!({
                    "player": {"steamid": "2", "match_stats": {"kills": 25, "deaths": 1}},
                    "allplayers": {
                        "1": {"match_stats": {"kills": 6, "deaths": 3}},
                        "2": {"match_stats": {"kills": 25, "deaths": 1}},
                    },
                }),
            ],
        );
        let stats = project(&store, false);
        assert_eq!((stats.kills, stats.deaths, stats.kd), (6, 3, 2.0));
    }

    #[test]
    fn test_allplayers_numeric_key_match() {
        let store = store_with(
            IdentityMode::PassThrough,
            &[
                json!({"player": {"steamid": 76561198000000001u64}}),
                json!({"allplayers": {" 76561198000000001": {"match_stats": {"kills": 4, "deaths": 2}}}}),
            ],
        );
        let stats = project(&store, false);
        assert_eq!((stats.kills, stats.deaths), (4, 2));
    }

    #[test]
    fn test_empty_allplayers_stats_fall_back_to_focused() {
        let store = store_with(
            IdentityMode::Strict,
            &[json!({
                "player": {"steamid": "1", "match_stats": {"kills": 8, "deaths": 2}},
                "allplayers": {"1": {"match_stats": {}}},
            })],
        );
        assert_eq!(project(&store, false).kd, 4.0);
    }

    #[test]
    fn test_strict_mode_ignores_spectated_player() {
        let store = store_with(
            IdentityMode::Strict,
            &[
                json!({"player": {"steamid": "1", "match_stats": {"kills": 3, "deaths": 1}}}),
                json!({"player": {"steamid": "2", "match_stats": {"kills": 40, "deaths": 2}}}),
            ],
        );
        let stats = project(&store, false);
        assert_eq!((stats.kills, stats.deaths), (3, 1));
    }

    #[test]
    fn test_pass_through_follows_spectated_player() {
        let store = store_with(
            IdentityMode::PassThrough,
            &[
                json!({"player": {"steamid": "1", "match_stats": {"kills": 3, "deaths": 1}}}),
                json!({"player": {"steamid": "2", "match_stats": {"kills": 40, "deaths": 2}}}),
            ],
        );
        let stats = project(&store, false);
        assert_eq!((stats.kills, stats.deaths), (40, 2));
    }

    #[test]
    fn test_chicken_visibility() {
        assert!(shows_chickens(Some("de_Inferno"), 0));
        assert!(shows_chickens(Some("DE_DUST2"), 0));
        assert!(shows_chickens(Some("de_mirage"), 2));
        assert!(shows_chickens(None, 1));
        assert!(!shows_chickens(Some("de_mirage"), 0));
        assert!(!shows_chickens(None, 0));
    }

    #[test]
    fn test_chicken_fields_projected() {
        let store = store_with(
            IdentityMode::PassThrough,
            &[json!({
                "map": {"name": "de_mirage"},
                "player": {"steamid": "1", "match_stats": {"kills": 1, "chicken_kills": "3"}},
            })],
        );
        let stats = project(&store, true);
        assert_eq!(stats.chicken_kills, Some(3));
        assert_eq!(stats.show_chickens, Some(true));

        let plain = project(&store, false);
        assert_eq!(plain.chicken_kills, None);
        assert_eq!(plain.show_chickens, None);
    }

    #[test]
    fn test_debug_snapshot_lists_keys() {
        let store = store_with(
            IdentityMode::Strict,
            &[json!({
                "player": {"steamid": "1", "match_stats": {"kills": 2, "deaths": 1}},
                "allplayers": {"1": {"match_stats": {"kills": 2, "mvps": 0}}},
            })],
        );
        let snap = debug_snapshot(&store, IdentityMode::Strict, false);
        assert_eq!(snap.local_steamid.as_deref(), Some("1"));
        assert_eq!(snap.mode, "strict");
        assert_eq!(snap.debug_keys.player_match_stats_keys, vec!["deaths", "kills"]);
        assert_eq!(snap.debug_keys.allplayers_me_match_stats_keys, vec!["kills", "mvps"]);
        assert_eq!(snap.pushes_merged, 1);
        assert!(snap.last_update.is_some());
    }

    #[test]
    fn test_debug_snapshot_empty_state() {
        let snap = debug_snapshot(&StateStore::new(), IdentityMode::PassThrough, false);
        assert_eq!(snap.local_steamid, None);
        assert_eq!(snap.player, json!({}));
        assert!(snap.debug_keys.player_match_stats_keys.is_empty());
        assert!(snap.last_update.is_none());
    }
}
