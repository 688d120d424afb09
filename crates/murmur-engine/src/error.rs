use thiserror::Error;

use murmur_shared::{GroupId, MessageType, UnknownMessageType, UserId};
use murmur_store::StoreError;

use crate::invite::InviteError;

/// Errors surfaced by the mutation engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Structural lookup or invariant failure in canonical state.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Text message content is empty")]
    EmptyContent,

    #[error("Unsupported message type: {0}")]
    UnsupportedMessageType(String),

    /// File info or payload does not fit the message type.
    #[error("Invalid {kind} payload: {reason}")]
    InvalidPayload { kind: MessageType, reason: String },

    #[error("Group name is empty")]
    EmptyGroupName,

    #[error("A group needs at least one member")]
    NoMembers,

    #[error("User {user} is not a member of group {group}")]
    NotAMember { group: GroupId, user: UserId },

    #[error("Display name is empty")]
    EmptyDisplayName,

    #[error("Invitation not found: {0}")]
    InvitationNotFound(String),

    #[error("Invitation error: {0}")]
    Invite(#[from] InviteError),

    /// A command could not be parsed at the boundary.
    #[error("Malformed command: {0}")]
    MalformedCommand(String),
}

impl EngineError {
    pub(crate) fn invalid_payload(kind: MessageType, reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            kind,
            reason: reason.into(),
        }
    }

    /// Stable short code for presentation layers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Store(StoreError::GroupNotFound(_)) => "group_not_found",
            Self::Store(StoreError::MessageNotFound(_)) => "message_not_found",
            Self::Store(StoreError::UserNotFound(_)) => "user_not_found",
            Self::Store(StoreError::NotAPoll(_)) => "not_a_poll",
            Self::Store(StoreError::InvalidOption { .. }) => "invalid_option",
            Self::Store(StoreError::DuplicateGroupId(_)) => "duplicate_group_id",
            Self::Store(StoreError::LockPoisoned) => "internal",
            Self::EmptyContent => "empty_content",
            Self::UnsupportedMessageType(_) => "unsupported_message_type",
            Self::InvalidPayload { .. } => "invalid_payload",
            Self::EmptyGroupName => "empty_group_name",
            Self::NoMembers => "no_members",
            Self::NotAMember { .. } => "not_a_member",
            Self::EmptyDisplayName => "empty_display_name",
            Self::InvitationNotFound(_) => "invitation_not_found",
            Self::Invite(_) => "invalid_invitation",
            Self::MalformedCommand(_) => "malformed_command",
        }
    }
}

impl From<UnknownMessageType> for EngineError {
    fn from(e: UnknownMessageType) -> Self {
        Self::UnsupportedMessageType(e.0)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;
