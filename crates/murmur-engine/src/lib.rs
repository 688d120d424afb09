//! # murmur-engine
//!
//! The mutation engine of Murmur. A [`ChatEngine`] owns the canonical
//! [`EntityStore`](murmur_store::EntityStore), validates every command
//! before it touches state, and applies it as one atomic group delta.
//!
//! - [`commands`] : mutations, typed and as JSON [`Command`]s
//! - [`sync`] : the polling read path (`get_state`, summaries)
//! - [`payload`] : per-type validation of outgoing messages
//! - [`invite`] : portable group invitations
//!
//! Remote activity is simulated by [`murmur_feed`] and stepped through
//! [`ChatEngine::tick_peer_simulation`].

pub mod commands;
pub mod engine;
pub mod error;
pub mod invite;
pub mod payload;
pub mod sync;

pub use commands::{Command, Effect};
pub use engine::ChatEngine;
pub use error::{EngineError, Result};
pub use invite::{InviteError, Invitation};
pub use payload::{compose_body, MessagePayload, PollDraft};
pub use sync::{GroupSummary, MessagePreview};
