//! Mutation commands.
//!
//! Every operation is available as a typed method on
//! [`ChatEngine`](crate::ChatEngine) (one module per concern) and as a
//! serializable [`Command`] for hosts that talk JSON. [`ChatEngine::execute`]
//! dispatches a parsed command and reports what it produced as an [`Effect`].

pub mod groups;
pub mod invitations;
pub mod messaging;
pub mod polls;
pub mod profile;
pub mod reactions;

use serde::{Deserialize, Serialize};
use tracing::debug;

use murmur_feed::FeedEvent;
use murmur_shared::{GroupId, MessageId, MessageType, UserId};
use murmur_store::{FileInfo, Group, Message, User};

use crate::engine::ChatEngine;
use crate::error::{EngineError, Result};
use crate::payload::MessagePayload;

/// A mutation request as it arrives at the boundary.
///
/// The message type of `sendMessage` is kept as a raw string so an unknown
/// value is reported as `UnsupportedMessageType` instead of a parse error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    CreateGroup {
        name: String,
        members: Vec<User>,
        #[serde(default)]
        initial_messages: Vec<Message>,
    },
    AddGroup {
        group: Group,
    },
    SendMessage {
        group_id: GroupId,
        author_id: UserId,
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        content: String,
        #[serde(default)]
        file_info: Option<FileInfo>,
        #[serde(default)]
        payload: Option<MessagePayload>,
    },
    DeleteMessage {
        group_id: GroupId,
        message_id: MessageId,
    },
    ToggleReaction {
        group_id: GroupId,
        message_id: MessageId,
        user_id: UserId,
        emoji: String,
    },
    VoteOnPoll {
        group_id: GroupId,
        message_id: MessageId,
        option_index: usize,
        user_id: UserId,
    },
    MarkGroupRead {
        group_id: GroupId,
        user_id: UserId,
    },
    UpdateProfile {
        name: String,
        #[serde(default)]
        avatar_url: String,
    },
    AcceptInvitation {
        invitation_id: String,
    },
    DeclineInvitation {
        invitation_id: String,
    },
    TickPeerSimulation,
}

impl Command {
    /// Parse a JSON command.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::MalformedCommand(e.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateGroup { .. } => "createGroup",
            Self::AddGroup { .. } => "addGroup",
            Self::SendMessage { .. } => "sendMessage",
            Self::DeleteMessage { .. } => "deleteMessage",
            Self::ToggleReaction { .. } => "toggleReaction",
            Self::VoteOnPoll { .. } => "voteOnPoll",
            Self::MarkGroupRead { .. } => "markGroupRead",
            Self::UpdateProfile { .. } => "updateProfile",
            Self::AcceptInvitation { .. } => "acceptInvitation",
            Self::DeclineInvitation { .. } => "declineInvitation",
            Self::TickPeerSimulation => "tickPeerSimulation",
        }
    }
}

/// What a successfully executed [`Command`] produced.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "effect", content = "value", rename_all = "camelCase")]
pub enum Effect {
    Group(Group),
    Message(Message),
    User(User),
    /// Number of entities touched (receipts added, invitations dropped).
    Count(usize),
    Events(Vec<FeedEvent>),
    Done,
}

impl ChatEngine {
    /// Run one command against canonical state.
    pub fn execute(&self, command: Command) -> Result<Effect> {
        debug!(command = command.name(), "Executing command");

        let effect = match command {
            Command::CreateGroup {
                name,
                members,
                initial_messages,
            } => Effect::Group(self.create_group(&name, members, initial_messages)?),
            Command::AddGroup { group } => {
                self.add_group(group)?;
                Effect::Done
            }
            Command::SendMessage {
                group_id,
                author_id,
                kind,
                content,
                file_info,
                payload,
            } => {
                let kind: MessageType = kind.parse()?;
                Effect::Message(self.send_message(&group_id, &author_id, kind, &content, file_info, payload)?)
            }
            Command::DeleteMessage { group_id, message_id } => {
                self.delete_message(&group_id, &message_id)?;
                Effect::Done
            }
            Command::ToggleReaction {
                group_id,
                message_id,
                user_id,
                emoji,
            } => {
                self.toggle_reaction(&group_id, &message_id, &user_id, &emoji)?;
                Effect::Done
            }
            Command::VoteOnPoll {
                group_id,
                message_id,
                option_index,
                user_id,
            } => {
                self.vote_on_poll(&group_id, &message_id, option_index, &user_id)?;
                Effect::Done
            }
            Command::MarkGroupRead { group_id, user_id } => Effect::Count(self.mark_group_read(&group_id, &user_id)?),
            Command::UpdateProfile { name, avatar_url } => Effect::User(self.update_profile(&name, &avatar_url)?),
            Command::AcceptInvitation { invitation_id } => Effect::Group(self.accept_invitation(&invitation_id)?),
            Command::DeclineInvitation { invitation_id } => {
                Effect::Count(usize::from(self.decline_invitation(&invitation_id)?))
            }
            Command::TickPeerSimulation => Effect::Events(self.tick_peer_simulation()),
        };

        Ok(effect)
    }

    /// Parse and run a JSON command.
    pub fn execute_json(&self, json: &str) -> Result<Effect> {
        self.execute(Command::from_json(json)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::engine::test_support::*;

    fn run(engine: &ChatEngine, value: serde_json::Value) -> Result<Effect> {
        engine.execute_json(&value.to_string())
    }

    fn sent(effect: Effect) -> Message {
        match effect {
            Effect::Message(message) => message,
            other => panic!("expected a message, got {other:?}"),
        }
    }

    #[test]
    fn test_scenario_send_and_react() {
        let engine = engine();
        let Effect::Group(group) = run(
            &engine,
            json!({
                "command": "createGroup",
                "name": "Phoenix",
                "members": [you(), alex()],
            }),
        )
        .unwrap() else {
            panic!("expected a group");
        };

        let msg = sent(
            run(
                &engine,
                json!({
                    "command": "sendMessage",
                    "groupId": group.id,
                    "authorId": "user-1",
                    "type": "TEXT",
                    "content": "hi",
                }),
            )
            .unwrap(),
        );

        let state = engine.get_state().unwrap();
        assert_eq!(state[0].messages.len(), 1);
        assert_eq!(state[0].messages[0].author_id, you().id);
        assert_eq!(state[0].messages[0].read_by.len(), 1);

        let react = json!({
            "command": "toggleReaction",
            "groupId": group.id,
            "messageId": msg.id,
            "userId": "user-2",
            "emoji": "👍",
        });
        assert_eq!(run(&engine, react.clone()).unwrap(), Effect::Done);
        assert_eq!(run(&engine, react).unwrap(), Effect::Done);
        assert!(engine.get_state().unwrap()[0].messages[0].reactions.is_empty());
    }

    #[test]
    fn test_scenario_poll_vote_moves() {
        let (engine, group) = phoenix();
        let msg = sent(
            run(
                &engine,
                json!({
                    "command": "sendMessage",
                    "groupId": group.id,
                    "authorId": "user-1",
                    "type": "POLL",
                    "payload": { "poll": { "question": "Which?", "options": ["A", "B"] } },
                }),
            )
            .unwrap(),
        );

        for option in [0, 1] {
            run(
                &engine,
                json!({
                    "command": "voteOnPoll",
                    "groupId": group.id,
                    "messageId": msg.id,
                    "optionIndex": option,
                    "userId": "user-1",
                }),
            )
            .unwrap();
        }

        let state = engine.get_state().unwrap();
        let poll = state[0].messages[0].poll().unwrap();
        assert!(!poll.options[0].votes.contains(&you().id));
        assert!(poll.options[1].votes.contains(&you().id));
    }

    #[test]
    fn test_scenario_delete_nonexistent() {
        let (engine, group) = phoenix();
        engine
            .send_message(&group.id, &you().id, MessageType::Text, "stay", None, None)
            .unwrap();
        let before = engine.get_state().unwrap();

        let effect = run(
            &engine,
            json!({ "command": "deleteMessage", "groupId": group.id, "messageId": "nonexistent" }),
        )
        .unwrap();
        assert_eq!(effect, Effect::Done);
        assert_eq!(engine.get_state().unwrap(), before);
    }

    #[test]
    fn test_scenario_tick_without_shared_group() {
        let engine = engine_with(1.0);
        engine.register_user(sam()).unwrap();
        engine.create_group("Solo", vec![you()], Vec::new()).unwrap();
        let before = engine.get_state().unwrap();

        let effect = run(&engine, json!({ "command": "tickPeerSimulation" })).unwrap();
        assert_eq!(effect, Effect::Events(Vec::new()));
        assert_eq!(engine.get_state().unwrap(), before);
    }

    #[test]
    fn test_unknown_message_type_rejected_before_lookup() {
        let engine = engine();
        // The group does not exist either; the type is checked first.
        let err = run(
            &engine,
            json!({
                "command": "sendMessage",
                "groupId": "group-missing",
                "authorId": "user-1",
                "type": "STICKER",
                "content": "🐸",
            }),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::UnsupportedMessageType("STICKER".to_string()));
    }

    #[test]
    fn test_malformed_commands() {
        let engine = engine();
        for bad in [
            "not json",
            r#"{"command":"launchRockets"}"#,
            r#"{"command":"deleteMessage","groupId":"g"}"#,
        ] {
            assert_eq!(engine.execute_json(bad).unwrap_err().kind(), "malformed_command", "{bad}");
        }
    }

    #[test]
    fn test_snapshot_isolation() {
        let (engine, group) = phoenix();
        engine
            .send_message(&group.id, &you().id, MessageType::Text, "original", None, None)
            .unwrap();

        let mut snapshot = engine.get_state().unwrap();
        snapshot[0].name = "Renamed".to_string();
        snapshot[0].messages[0].content = "tampered".to_string();
        snapshot[0].messages.clear();
        snapshot.clear();

        let fresh = engine.get_state().unwrap();
        assert_eq!(fresh[0].name, "Phoenix");
        assert_eq!(fresh[0].messages[0].content, "original");
    }

    #[test]
    fn test_effect_json_shape() {
        let value = serde_json::to_value(Effect::Count(3)).unwrap();
        assert_eq!(value, json!({ "effect": "count", "value": 3 }));
        let value = serde_json::to_value(Effect::Done).unwrap();
        assert_eq!(value, json!({ "effect": "done" }));
    }

    #[test]
    fn test_update_profile_command() {
        let engine = engine();
        let effect = run(
            &engine,
            json!({ "command": "updateProfile", "name": "Ghost", "avatarUrl": "g.png" }),
        )
        .unwrap();
        let Effect::User(user) = effect else {
            panic!("expected a user");
        };
        assert_eq!(user.name, "Ghost");
        assert_eq!(user.avatar_url, "g.png");
    }
}
