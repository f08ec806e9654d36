//! Local player identity resolution
//!
//! GSI pushes carry a `player` section describing whoever the game is
//! currently focused on. While alive that is the local player; while
//! spectating it silently becomes a teammate. The first identity we ever
//! see is pinned as "ours" for the rest of the process.

use serde_json::{Map, Value};

/// Section holding the focused entity.
pub const FOCUSED_KEY: &str = "player";
/// Section holding every visible entity keyed by identity.
pub const ALL_PLAYERS_KEY: &str = "allplayers";

const IDENTITY_FIELDS: [&str; 2] = ["steamid", "steamid64"];

/// How pushes for a non-local focused entity are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityMode {
    /// Merge everything; the overlay follows whoever the game focuses on.
    #[default]
    PassThrough,
    /// Drop the focused section when it belongs to someone else.
    Strict,
}

impl IdentityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityMode::PassThrough => "pass_through",
            IdentityMode::Strict => "strict",
        }
    }
}

/// Coerce a raw identity value to its comparable string form.
///
/// Numbers and strings are both accepted since the game has sent either.
pub fn normalize_identity(raw: &Value) -> Option<String> {
    let text = match raw {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Identity of the focused entity carried by a push, if any.
pub fn focused_identity(update: &Map<String, Value>) -> Option<String> {
    let player = update.get(FOCUSED_KEY)?.as_object()?;
    IDENTITY_FIELDS
        .iter()
        .filter_map(|field| player.get(*field))
        .find_map(normalize_identity)
}

/// What the resolver decided for a single push.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Set when this push pinned the local identity.
    pub captured: Option<String>,
    /// Set when the focused section was removed before merging.
    pub stripped_focus: Option<String>,
}

/// Pin the local identity if still unset, then apply the mode filter.
///
/// Must run inside the same critical section as the merge that follows.
pub fn resolve(
    local: &mut Option<String>,
    update: &mut Map<String, Value>,
    mode: IdentityMode,
) -> Resolution {
    let incoming = focused_identity(update);
    let mut resolution = Resolution::default();

    if local.is_none() {
        if let Some(id) = &incoming {
            *local = Some(id.clone());
            resolution.captured = Some(id.clone());
        }
    }

    if mode == IdentityMode::Strict {
        if let (Some(incoming), Some(local)) = (incoming, local.as_deref()) {
            if incoming != local {
                update.remove(FOCUSED_KEY);
                resolution.stripped_focus = Some(incoming);
            }
        }
    }

    resolution
}
