//! Domain model structs held in canonical state.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to a presentation layer, and `Clone` so snapshots are plain
//! deep copies.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use murmur_shared::{GroupId, MessageId, MessageType, UserId};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A known participant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier, never changes.
    pub id: UserId,
    /// Human-readable display name.
    pub name: String,
    /// Avatar image reference (URL).
    pub avatar_url: String,
    /// Presence flag as last reported.
    pub is_online: bool,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, avatar_url: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            name: name.into(),
            avatar_url: avatar_url.into(),
            is_online: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Message payloads
// ---------------------------------------------------------------------------

/// Display metadata of an attached file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub file_name: String,
    /// Human-readable size as reported by the sender ("1.2 MB").
    pub file_size: String,
}

/// One answer of a poll together with the users who picked it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollOption {
    pub text: String,
    pub votes: BTreeSet<UserId>,
}

/// A single-choice poll.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Poll {
    pub question: String,
    pub options: Vec<PollOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub title: String,
    /// Date and time as entered by the organiser.
    pub date_time: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

/// Type-specific part of a message. The variant *is* the message type, so
/// a payload can never be attached to a message of the wrong kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageBody {
    Text,
    Image(Option<FileInfo>),
    Video(Option<FileInfo>),
    File(Option<FileInfo>),
    System,
    Poll(Poll),
    Event(EventDetails),
    Location(GeoLocation),
}

impl MessageBody {
    pub fn kind(&self) -> MessageType {
        match self {
            Self::Text => MessageType::Text,
            Self::Image(_) => MessageType::Image,
            Self::Video(_) => MessageType::Video,
            Self::File(_) => MessageType::File,
            Self::System => MessageType::System,
            Self::Poll(_) => MessageType::Poll,
            Self::Event(_) => MessageType::Event,
            Self::Location(_) => MessageType::Location,
        }
    }

    pub fn file_info(&self) -> Option<&FileInfo> {
        match self {
            Self::Image(info) | Self::Video(info) | Self::File(info) => info.as_ref(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// emoji -> users who reacted with it. Keys with no users are never stored.
pub type Reactions = BTreeMap<String, BTreeSet<UserId>>;

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Assigned once at creation, never reused.
    pub id: MessageId,
    /// Author, or the `system` sentinel.
    pub author_id: UserId,
    /// Primary payload: text, URI or caption depending on the body.
    pub content: String,
    /// Creation instant.
    pub timestamp: DateTime<Utc>,
    pub body: MessageBody,
    pub reactions: Reactions,
    /// Users who have seen the message.
    pub read_by: BTreeSet<UserId>,
}

impl Message {
    /// Build a fresh message: new id, current time, read by its author only.
    pub fn new(author_id: UserId, content: impl Into<String>, body: MessageBody) -> Self {
        let mut read_by = BTreeSet::new();
        read_by.insert(author_id.clone());
        Self {
            id: MessageId::generate(),
            author_id,
            content: content.into(),
            timestamp: Utc::now(),
            body,
            reactions: Reactions::new(),
            read_by,
        }
    }

    /// Build a system notice already read by `readers`.
    pub fn system<'a>(content: impl Into<String>, readers: impl IntoIterator<Item = &'a UserId>) -> Self {
        let mut message = Self::new(UserId::system(), content, MessageBody::System);
        message.read_by.extend(readers.into_iter().cloned());
        message
    }

    pub fn kind(&self) -> MessageType {
        self.body.kind()
    }
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// A conversation with an ordered member list and an ordered message log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    /// Unique per user id, in join order.
    pub members: Vec<User>,
    /// Append order; deletions leave no gaps.
    pub messages: Vec<Message>,
}

impl Group {
    /// Build a group with a fresh id. Duplicate member ids keep their first
    /// occurrence.
    pub fn new(name: impl Into<String>, members: Vec<User>, messages: Vec<Message>) -> Self {
        let mut group = Self {
            id: GroupId::generate(),
            name: name.into(),
            members: Vec::with_capacity(members.len()),
            messages,
        };
        for member in members {
            group.add_member(member);
        }
        group
    }
}
