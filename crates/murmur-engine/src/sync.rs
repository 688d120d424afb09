//! The read path.
//!
//! Consumers poll [`ChatEngine::get_state`] on a cadence, or right after an
//! optimistic local mutation, and render whatever comes back. Nothing here
//! keeps per-consumer state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use murmur_shared::constants::PREVIEW_CHARS;
use murmur_shared::{GroupId, MessageType, UserId};
use murmur_store::{Group, Message};

use crate::engine::ChatEngine;
use crate::error::Result;

/// Sidebar row for one group, as seen by the local user.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: GroupId,
    pub name: String,
    pub member_count: usize,
    pub unread_count: usize,
    pub last_message: Option<MessagePreview>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessagePreview {
    pub author_id: UserId,
    pub kind: MessageType,
    pub preview: String,
    pub timestamp: DateTime<Utc>,
}

impl MessagePreview {
    fn of(message: &Message) -> Self {
        Self {
            author_id: message.author_id.clone(),
            kind: message.kind(),
            preview: preview_text(message),
            timestamp: message.timestamp,
        }
    }
}

/// One-line text for a message: its content cut to [`PREVIEW_CHARS`]
/// characters, else the attached file name, else the type.
fn preview_text(message: &Message) -> String {
    let content = message.content.trim();
    if content.is_empty() {
        return match message.body.file_info() {
            Some(file) => file.file_name.clone(),
            None => format!("[{}]", message.kind()),
        };
    }

    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

impl ChatEngine {
    /// Deep snapshot of every group with its members and messages, in
    /// insertion order. Mutating it never affects the engine.
    pub fn get_state(&self) -> Result<Vec<Group>> {
        Ok(self.store.snapshot()?)
    }

    /// Deep copy of a single group.
    pub fn get_group(&self, group_id: &GroupId) -> Result<Group> {
        Ok(self.store.group(group_id)?)
    }

    /// Per-group overview for the local user, computed without copying
    /// message logs.
    pub fn group_summaries(&self) -> Result<Vec<GroupSummary>> {
        let me = &self.local_user;
        Ok(self.store.read(|groups, _| {
            groups
                .iter()
                .map(|group| GroupSummary {
                    id: group.id.clone(),
                    name: group.name.clone(),
                    member_count: group.members.len(),
                    unread_count: group.unread_count(me),
                    last_message: group.last_message().map(MessagePreview::of),
                })
                .collect::<Vec<_>>()
        })?)
    }

    /// Total messages the local user has not read, across all groups.
    pub fn total_unread(&self) -> Result<usize> {
        let me = &self.local_user;
        Ok(self
            .store
            .read(|groups, _| groups.iter().map(|g| g.unread_count(me)).sum::<usize>())?)
    }
}
