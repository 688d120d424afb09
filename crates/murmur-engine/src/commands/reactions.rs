use tracing::debug;

use murmur_shared::{GroupId, MessageId, UserId};

use crate::engine::ChatEngine;
use crate::error::{EngineError, Result};

impl ChatEngine {
    /// Add `user_id`'s `emoji` reaction, or remove it if already present.
    /// Calling twice restores the previous state.
    pub fn toggle_reaction(
        &self,
        group_id: &GroupId,
        message_id: &MessageId,
        user_id: &UserId,
        emoji: &str,
    ) -> Result<()> {
        let added = self.store.apply_delta(group_id, |group| {
            let message = group.message_mut(message_id)?;
            Ok::<_, EngineError>(message.toggle_reaction(user_id, emoji))
        })?;
        debug!(msg = %message_id, user = %user_id, emoji, added, "Toggled reaction");
        Ok(())
    }
}
