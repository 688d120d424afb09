//! # murmur-store
//!
//! Canonical in-memory state for Murmur: users, groups and messages.
//!
//! The crate exposes a thread-safe [`EntityStore`] with copy-on-read
//! snapshots and atomic per-group deltas, plus entity-level mutators on the
//! domain models that keep every invariant (one vote per user per poll, no
//! empty reaction keys, no duplicate message ids) by construction.

pub mod groups;
pub mod models;
pub mod polls;
pub mod reactions;
pub mod store;
pub mod users;

mod error;

pub use error::{Result, StoreError};
pub use models::*;
pub use polls::VoteOutcome;
pub use store::EntityStore;
