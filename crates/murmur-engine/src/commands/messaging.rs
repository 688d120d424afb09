use tracing::debug;

use murmur_shared::{GroupId, MessageId, MessageType, UserId};
use murmur_store::{FileInfo, Message};

use crate::engine::ChatEngine;
use crate::error::{EngineError, Result};
use crate::payload::{compose_body, MessagePayload};

impl ChatEngine {
    /// Append a new message to a group and return it, so the caller can
    /// show it before the next snapshot arrives.
    ///
    /// Input is validated before the group is touched: `EmptyContent` for
    /// blank text, `InvalidPayload` for file info / payload that does not fit
    /// `kind`, `NotAMember` when a non-system author is not in the group.
    pub fn send_message(
        &self,
        group_id: &GroupId,
        author_id: &UserId,
        kind: MessageType,
        content: &str,
        file_info: Option<FileInfo>,
        payload: Option<MessagePayload>,
    ) -> Result<Message> {
        if kind == MessageType::Text && content.trim().is_empty() {
            return Err(EngineError::EmptyContent);
        }
        let body = compose_body(kind, file_info, payload)?;
        let message = Message::new(author_id.clone(), content, body);

        self.store.apply_delta(group_id, |group| {
            if !author_id.is_system() && !group.is_member(author_id) {
                return Err(EngineError::NotAMember {
                    group: group.id.clone(),
                    user: author_id.clone(),
                });
            }
            group.push_message(message.clone());
            Ok(())
        })?;

        debug!(group = %group_id, msg = %message.id, kind = %kind, "Message sent");
        Ok(message)
    }

    /// Remove a message. Deleting a message that is already gone succeeds,
    /// so duplicate deletes are harmless.
    pub fn delete_message(&self, group_id: &GroupId, message_id: &MessageId) -> Result<()> {
        let removed = self
            .store
            .apply_delta(group_id, |group| Ok::<_, EngineError>(group.remove_message(message_id)))?;
        debug!(group = %group_id, msg = %message_id, removed, "Delete message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::*;
    use murmur_store::{MessageBody, StoreError};

    #[test]
    fn test_send_text() {
        let (engine, group) = phoenix();
        let msg = engine
            .send_message(&group.id, &you().id, MessageType::Text, "hi", None, None)
            .unwrap();

        let state = engine.get_state().unwrap();
        assert_eq!(state[0].messages.len(), 1);
        let stored = &state[0].messages[0];
        assert_eq!(stored.id, msg.id);
        assert_eq!(stored.author_id, you().id);
        assert_eq!(stored.read_by.iter().collect::<Vec<_>>(), vec![&you().id]);
        assert!(stored.reactions.is_empty());
    }

    #[test]
    fn test_sent_messages_keep_append_order() {
        let (engine, group) = phoenix();
        let ids: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|text| {
                engine
                    .send_message(&group.id, &alex().id, MessageType::Text, text, None, None)
                    .unwrap()
                    .id
            })
            .collect();
        let state = engine.get_state().unwrap();
        let stored: Vec<_> = state[0].messages.iter().map(|m| m.id.clone()).collect();
        assert_eq!(stored, ids);
    }

    #[test]
    fn test_send_rejects_blank_text() {
        let (engine, group) = phoenix();
        let err = engine
            .send_message(&group.id, &you().id, MessageType::Text, " \n\t", None, None)
            .unwrap_err();
        assert_eq!(err, EngineError::EmptyContent);
        assert!(engine.get_state().unwrap()[0].messages.is_empty());
    }

    #[test]
    fn test_blank_file_message_is_fine() {
        let (engine, group) = phoenix();
        let info = FileInfo {
            file_name: "project-specs.pdf".to_string(),
            file_size: "856 KB".to_string(),
        };
        let msg = engine
            .send_message(&group.id, &alex().id, MessageType::File, "", Some(info.clone()), None)
            .unwrap();
        assert_eq!(msg.body, MessageBody::File(Some(info)));
    }

    #[test]
    fn test_send_to_unknown_group() {
        let engine = engine();
        let missing = GroupId::from("group-404");
        let err = engine
            .send_message(&missing, &you().id, MessageType::Text, "hi", None, None)
            .unwrap_err();
        assert_eq!(err, EngineError::Store(StoreError::GroupNotFound(missing)));
    }

    #[test]
    fn test_send_by_outsider_rejected() {
        let (engine, group) = phoenix();
        let err = engine
            .send_message(&group.id, &sam().id, MessageType::Text, "let me in", None, None)
            .unwrap_err();
        assert_eq!(err.kind(), "not_a_member");
        assert!(engine.get_state().unwrap()[0].messages.is_empty());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (engine, group) = phoenix();
        let keep = engine
            .send_message(&group.id, &you().id, MessageType::Text, "keep", None, None)
            .unwrap();
        let gone = engine
            .send_message(&group.id, &you().id, MessageType::Text, "gone", None, None)
            .unwrap();

        engine.delete_message(&group.id, &gone.id).unwrap();
        let once = engine.get_state().unwrap();
        engine.delete_message(&group.id, &gone.id).unwrap();
        let twice = engine.get_state().unwrap();

        assert_eq!(once, twice);
        assert_eq!(once[0].messages.len(), 1);
        assert_eq!(once[0].messages[0].id, keep.id);
    }

    #[test]
    fn test_delete_nonexistent_is_a_no_op() {
        let (engine, group) = phoenix();
        engine
            .send_message(&group.id, &you().id, MessageType::Text, "hi", None, None)
            .unwrap();
        let before = engine.get_state().unwrap();

        engine
            .delete_message(&group.id, &MessageId::from("nonexistent"))
            .unwrap();
        assert_eq!(engine.get_state().unwrap(), before);
    }

    #[test]
    fn test_delete_in_unknown_group_surfaces() {
        let engine = engine();
        let err = engine
            .delete_message(&GroupId::from("nope"), &MessageId::from("m"))
            .unwrap_err();
        assert_eq!(err.kind(), "group_not_found");
    }
}
