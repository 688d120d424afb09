use tracing::{debug, info};

use murmur_shared::{GroupId, MessageType, UserId};
use murmur_store::{Group, Message, User};

use crate::engine::ChatEngine;
use crate::error::{EngineError, Result};

impl ChatEngine {
    /// Create a group with a fresh id. `members` should include the creator.
    ///
    /// Initial messages follow the rules of [`send_message`](Self::send_message):
    /// no blank text, and every non-system author must be a member.
    pub fn create_group(&self, name: &str, members: Vec<User>, initial_messages: Vec<Message>) -> Result<Group> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptyGroupName);
        }
        if members.is_empty() {
            return Err(EngineError::NoMembers);
        }

        let mut group = Group::new(name, members, initial_messages);
        for message in &group.messages {
            if message.kind() == MessageType::Text && message.content.trim().is_empty() {
                return Err(EngineError::EmptyContent);
            }
            if !message.author_id.is_system() && !group.is_member(&message.author_id) {
                return Err(EngineError::NotAMember {
                    group: group.id.clone(),
                    user: message.author_id.clone(),
                });
            }
        }

        group.normalize();
        self.store.insert_group(group.clone())?;
        Ok(group)
    }

    /// Create a group led by the local user, opened with a system notice
    /// that every member has already seen.
    pub fn create_group_with_welcome(&self, name: &str, invitees: Vec<User>) -> Result<Group> {
        let creator = self.local_user()?;
        let welcome = format!("{} created the group \"{}\".", creator.name, name.trim());

        let mut members = Vec::with_capacity(invitees.len() + 1);
        members.push(creator);
        members.extend(invitees);

        let readers: Vec<UserId> = members.iter().map(|m| m.id.clone()).collect();
        let notice = Message::system(welcome, readers.iter());
        self.create_group(name, members, vec![notice])
    }

    /// Merge an externally supplied group, e.g. one joined by invitation.
    pub fn add_group(&self, group: Group) -> Result<()> {
        let id = group.id.clone();
        self.store.insert_group(group)?;
        info!(group = %id, "Merged external group");
        Ok(())
    }

    /// Mark every message of a group as read by `user_id`. Returns how many
    /// receipts were added.
    pub fn mark_group_read(&self, group_id: &GroupId, user_id: &UserId) -> Result<usize> {
        let marked = self.store.apply_delta(group_id, |group| {
            if !group.is_member(user_id) {
                return Err(EngineError::NotAMember {
                    group: group.id.clone(),
                    user: user_id.clone(),
                });
            }
            Ok(group.mark_all_read(user_id))
        })?;
        debug!(group = %group_id, user = %user_id, marked, "Marked group read");
        Ok(marked)
    }
}
