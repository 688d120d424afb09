// Identifiers and constants shared by every Murmur crate.

pub mod constants;
pub mod types;

pub use types::{GroupId, MessageId, MessageType, UnknownMessageType, UserId};
