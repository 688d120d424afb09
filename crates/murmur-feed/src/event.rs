use serde::Serialize;

use murmur_shared::{GroupId, MessageId, UserId};
use murmur_store::Message;

/// A synthetic piece of remote-peer activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FeedEvent {
    /// A peer posted a text message.
    RemoteMessage { group_id: GroupId, message: Message },
    /// A peer read a message.
    ReadReceipt {
        group_id: GroupId,
        message_id: MessageId,
        reader: UserId,
    },
}

impl FeedEvent {
    pub fn group_id(&self) -> &GroupId {
        match self {
            Self::RemoteMessage { group_id, .. } | Self::ReadReceipt { group_id, .. } => group_id,
        }
    }

    /// The peer the event originates from.
    pub fn peer(&self) -> &UserId {
        match self {
            Self::RemoteMessage { message, .. } => &message.author_id,
            Self::ReadReceipt { reader, .. } => reader,
        }
    }
}
