use tracing::debug;

use murmur_shared::{GroupId, MessageId, UserId};
use murmur_store::VoteOutcome;

use crate::engine::ChatEngine;
use crate::error::{EngineError, Result};

impl ChatEngine {
    /// Vote on a single-choice poll. Voting for the option already chosen
    /// retracts the vote; voting for another option moves it.
    pub fn vote_on_poll(
        &self,
        group_id: &GroupId,
        message_id: &MessageId,
        option_index: usize,
        user_id: &UserId,
    ) -> Result<VoteOutcome> {
        let outcome = self.store.apply_delta(group_id, |group| {
            let poll = group.message_mut(message_id)?.poll_mut()?;
            Ok::<_, EngineError>(poll.vote(option_index, user_id)?)
        })?;
        debug!(msg = %message_id, user = %user_id, option_index, ?outcome, "Poll vote");
        Ok(outcome)
    }
}
