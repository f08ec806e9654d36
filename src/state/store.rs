//! Cumulative game state store
//!
//! Every GSI push is a partial diff. The store folds each one into a single
//! JSON tree: objects merge key-by-key, anything else is replaced by the
//! newest value. Nothing is ever deleted.
//!
//! All access goes through one mutex so a reader never sees half of a push.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::{Map, Value};

use super::identity::{self, IdentityMode, Resolution};

/// Recursively fold `update` into `base`.
pub fn deep_merge(base: &mut Map<String, Value>, update: Map<String, Value>) {
    for (key, incoming) in update {
        match (base.get_mut(&key), incoming) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            (Some(slot), incoming) => *slot = incoming,
            (None, incoming) => {
                base.insert(key, incoming);
            }
        }
    }
}

/// Consistent read-only view handed to projections.
#[derive(Debug, Clone, Copy)]
pub struct StateView<'a> {
    pub state: &'a Map<String, Value>,
    pub local_identity: Option<&'a str>,
    pub pushes_merged: u64,
    pub last_merge_at: Option<DateTime<Utc>>,
}

impl<'a> StateView<'a> {
    /// Borrow the value at `path`, if every segment exists.
    pub fn get(&self, path: &[&str]) -> Option<&'a Value> {
        let (first, rest) = path.split_first()?;
        let mut node = self.state.get(*first)?;
        for segment in rest {
            node = node.as_object()?.get(*segment)?;
        }
        Some(node)
    }

    /// Borrow the object at `path`, if it is one.
    pub fn object(&self, path: &[&str]) -> Option<&'a Map<String, Value>> {
        self.get(path)?.as_object()
    }
}

/// Result of feeding one push through the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestOutcome {
    pub resolution: Resolution,
    /// False when the payload was not a JSON object.
    pub merged: bool,
}

#[derive(Debug, Default)]
struct StoreInner {
    state: Map<String, Value>,
    local_identity: Option<String>,
    pushes_merged: u64,
    last_merge_at: Option<DateTime<Utc>>,
}

impl StoreInner {
    fn merge_object(&mut self, update: Map<String, Value>) {
        deep_merge(&mut self.state, update);
        self.pushes_merged += 1;
        self.last_merge_at = Some(Utc::now());
    }
}

/// Process-wide holder of the cumulative state and the pinned local identity.
#[derive(Debug, Default)]
pub struct StateStore {
    inner: Mutex<StoreInner>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a raw update without identity handling. Non-objects are skipped.
    pub fn merge(&self, update: Value) -> bool {
        let Value::Object(update) = update else {
            return false;
        };
        self.inner.lock().merge_object(update);
        true
    }

    /// Resolve identity and merge, both under one lock acquisition.
    pub fn ingest(&self, update: Value, mode: IdentityMode) -> IngestOutcome {
        let Value::Object(mut update) = update else {
            return IngestOutcome::default();
        };

        let mut inner = self.inner.lock();
        let resolution = identity::resolve(&mut inner.local_identity, &mut update, mode);
        inner.merge_object(update);

        IngestOutcome {
            resolution,
            merged: true,
        }
    }

    /// Deep copy of the subtree at `path`. An empty path copies the whole state.
    pub fn snapshot(&self, path: &[&str]) -> Option<Value> {
        self.read(|view| {
            if path.is_empty() {
                Some(Value::Object(view.state.clone()))
            } else {
                view.get(path).cloned()
            }
        })
    }

    /// Run `f` against a consistent view of the state.
    pub fn read<R>(&self, f: impl FnOnce(StateView<'_>) -> R) -> R {
        let inner = self.inner.lock();
        f(StateView {
            state: &inner.state,
            local_identity: inner.local_identity.as_deref(),
            pushes_merged: inner.pushes_merged,
            last_merge_at: inner.last_merge_at,
        })
    }

    pub fn local_identity(&self) -> Option<String> {
        self.inner.lock().local_identity.clone()
    }

    pub fn pushes_merged(&self) -> u64 {
        self.inner.lock().pushes_merged
    }

    pub fn last_merge_at(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().last_merge_at
    }
}
