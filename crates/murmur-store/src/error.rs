use thiserror::Error;

use murmur_shared::{GroupId, MessageId, UserId};

/// Errors produced by the store layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No group with this id exists in canonical state.
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    /// The group exists but holds no message with this id.
    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    /// The user directory has no entry for this id.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// A vote was cast on a message that carries no poll.
    #[error("Message {0} is not a poll")]
    NotAPoll(MessageId),

    /// Poll option index outside `0..len`.
    #[error("Invalid poll option {index} (poll has {len} options)")]
    InvalidOption { index: usize, len: usize },

    /// A group with this id is already present.
    #[error("Duplicate group id: {0}")]
    DuplicateGroupId(GroupId),

    /// A previous writer panicked while holding the store lock.
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
