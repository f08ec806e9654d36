//! Shared game state: the merged GSI tree and the pinned local identity.

pub mod identity;
pub mod store;

pub use identity::{IdentityMode, Resolution};
pub use store::{deep_merge, IngestOutcome, StateStore, StateView};
