//! Entity-level operations on a [`Group`] and its message log.

use std::collections::BTreeSet;

use murmur_shared::{MessageId, UserId};
use tracing::{debug, trace};

use crate::error::{Result, StoreError};
use crate::models::{Group, Message, User};

impl Group {
    // ------------------------------------------------------------------
    // Membership
    // ------------------------------------------------------------------

    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.members.iter().any(|m| &m.id == user_id)
    }

    /// Append a member. Returns `false` if the user was already a member.
    pub fn add_member(&mut self, user: User) -> bool {
        if self.is_member(&user.id) {
            return false;
        }
        self.members.push(user);
        true
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    pub fn message(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Mutable access to a message, `MessageNotFound` if absent.
    pub fn message_mut(&mut self, id: &MessageId) -> Result<&mut Message> {
        self.messages
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| StoreError::MessageNotFound(id.clone()))
    }

    /// Append a message. A message whose id is already in the log is a
    /// redelivery and is dropped; returns whether the log grew.
    pub fn push_message(&mut self, message: Message) -> bool {
        if self.message(&message.id).is_some() {
            trace!(group = %self.id, msg = %message.id, "Dropping duplicate message");
            return false;
        }
        self.messages.push(message);
        true
    }

    /// Remove a message, keeping the order of the rest. Returns `true` if
    /// something was removed.
    pub fn remove_message(&mut self, id: &MessageId) -> bool {
        match self.messages.iter().position(|m| &m.id == id) {
            Some(index) => {
                self.messages.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    // ------------------------------------------------------------------
    // Read receipts
    // ------------------------------------------------------------------

    /// Number of messages `user_id` has not read yet.
    pub fn unread_count(&self, user_id: &UserId) -> usize {
        self.messages
            .iter()
            .filter(|m| !m.read_by.contains(user_id))
            .count()
    }

    /// The oldest message `user_id` has not read.
    pub fn oldest_unread(&self, user_id: &UserId) -> Option<&Message> {
        self.messages.iter().find(|m| !m.read_by.contains(user_id))
    }

    /// Mark every message as read by `user_id`. Returns how many changed.
    pub fn mark_all_read(&mut self, user_id: &UserId) -> usize {
        self.messages
            .iter_mut()
            .map(|m| m.mark_read(user_id))
            .filter(|changed| *changed)
            .count()
    }

    // ------------------------------------------------------------------
    // Invariants
    // ------------------------------------------------------------------

    /// Bring a group built elsewhere in line with the store invariants:
    /// unique member and message ids (first occurrence wins), no empty
    /// emoji keys, one vote per user per poll (first option wins), and
    /// `read_by` limited to members plus the author.
    ///
    /// Returns the number of repairs; `0` for a well-formed group.
    pub fn normalize(&mut self) -> usize {
        let mut repairs = 0;

        let mut member_ids = BTreeSet::new();
        let before = self.members.len();
        self.members.retain(|m| member_ids.insert(m.id.clone()));
        repairs += before - self.members.len();

        let mut message_ids = BTreeSet::new();
        let before = self.messages.len();
        self.messages.retain(|m| message_ids.insert(m.id.clone()));
        repairs += before - self.messages.len();

        for message in &mut self.messages {
            repairs += message.prune_reactions();
            if let Ok(poll) = message.poll_mut() {
                repairs += poll.dedupe_votes();
            }

            let author = message.author_id.clone();
            let before = message.read_by.len();
            message
                .read_by
                .retain(|reader| *reader == author || member_ids.contains(reader));
            repairs += before - message.read_by.len();
        }

        if repairs > 0 {
            debug!(group = %self.id, repairs, "Normalized group");
        }
        repairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageBody;

    fn alice() -> User {
        User::new("user-1", "Alice", "")
    }

    fn bob() -> User {
        User::new("user-2", "Bob", "")
    }

    #[test]
    fn test_new_group_dedups_members() {
        let group = Group::new("Phoenix", vec![alice(), bob(), alice()], Vec::new());
        assert_eq!(group.members.len(), 2);
        assert_eq!(group.members[0].id, UserId::from("user-1"));
        assert!(group.id.as_str().starts_with("group-"));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut group = Group::new("g", vec![alice()], Vec::new());
        let ids: Vec<_> = (0..3)
            .map(|i| {
                let m = Message::new(alice().id, format!("m{i}"), MessageBody::Text);
                let id = m.id.clone();
                group.push_message(m);
                id
            })
            .collect();

        assert!(group.remove_message(&ids[1]));
        assert!(!group.remove_message(&ids[1]));

        let remaining: Vec<_> = group.messages.iter().map(|m| m.id.clone()).collect();
        assert_eq!(remaining, vec![ids[0].clone(), ids[2].clone()]);
    }

    #[test]
    fn test_push_drops_redelivery() {
        let mut group = Group::new("g", vec![alice()], Vec::new());
        let msg = Message::new(alice().id, "hi", MessageBody::Text);
        assert!(group.push_message(msg.clone()));
        assert!(!group.push_message(msg));
        assert_eq!(group.messages.len(), 1);
    }

    #[test]
    fn test_unread_and_mark_all_read() {
        let mut group = Group::new("g", vec![alice(), bob()], Vec::new());
        group.push_message(Message::new(alice().id, "one", MessageBody::Text));
        group.push_message(Message::new(alice().id, "two", MessageBody::Text));
        group.push_message(Message::new(bob().id, "three", MessageBody::Text));

        let bob_id = bob().id;
        assert_eq!(group.unread_count(&bob_id), 2);
        assert_eq!(group.oldest_unread(&bob_id).map(|m| m.content.as_str()), Some("one"));

        assert_eq!(group.mark_all_read(&bob_id), 2);
        assert_eq!(group.unread_count(&bob_id), 0);
        assert!(group.oldest_unread(&bob_id).is_none());
        assert_eq!(group.mark_all_read(&bob_id), 0);
    }

    #[test]
    fn test_normalize_repairs_foreign_group() {
        let mut poll_msg = Message::new(
            alice().id,
            "",
            MessageBody::Poll(crate::models::Poll::new("Where?", ["Here", "There"])),
        );
        poll_msg.reactions.insert("👍".to_string(), BTreeSet::new());
        poll_msg.read_by.insert(UserId::from("outsider"));
        if let MessageBody::Poll(poll) = &mut poll_msg.body {
            poll.options[0].votes.insert(alice().id);
            poll.options[1].votes.insert(alice().id);
        }

        let mut group = Group::new("g", vec![alice(), bob()], Vec::new());
        group.messages = vec![poll_msg.clone(), poll_msg.clone()];
        group.members.push(bob());

        assert!(group.normalize() > 0);
        assert_eq!(group.members.len(), 2);
        assert_eq!(group.messages.len(), 1);
        let msg = &group.messages[0];
        assert!(msg.reactions.is_empty());
        assert!(!msg.read_by.contains(&UserId::from("outsider")));
        assert!(msg.read_by.contains(&alice().id));
        let poll = msg.poll().unwrap();
        assert_eq!(poll.voted_for(&alice().id), Some(0));
        assert_eq!(poll.total_votes(), 1);

        assert_eq!(group.normalize(), 0);
    }

    #[test]
    fn test_normalize_keeps_author_and_system_notices() {
        let mut group = Group::new("g", vec![alice()], Vec::new());
        // Author who has since left the group.
        group.messages.push(Message::new(bob().id, "bye", MessageBody::Text));
        group.messages.push(Message::system("hello", [alice().id].iter()));

        assert_eq!(group.normalize(), 0);
        assert!(group.messages[0].read_by.contains(&bob().id));
        assert!(group.messages[1].read_by.contains(&alice().id));
    }

    #[test]
    fn test_message_mut_not_found() {
        let mut group = Group::new("g", vec![alice()], Vec::new());
        let missing = MessageId::from("nope");
        assert_eq!(
            group.message_mut(&missing).unwrap_err(),
            StoreError::MessageNotFound(missing)
        );
    }
}
