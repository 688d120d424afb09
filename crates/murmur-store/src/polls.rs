//! Single-choice poll voting.

use std::collections::BTreeSet;

use murmur_shared::UserId;

use crate::error::{Result, StoreError};
use crate::models::{Message, MessageBody, Poll, PollOption};

/// What a call to [`Poll::vote`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// First vote of this user on the poll.
    Cast,
    /// The user picked the option they had already voted for; vote removed.
    Retracted,
    /// The vote moved from option `from` to the requested one.
    Moved { from: usize },
}

impl Poll {
    pub fn new(question: impl Into<String>, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            question: question.into(),
            options: options
                .into_iter()
                .map(|text| PollOption {
                    text: text.into(),
                    votes: BTreeSet::new(),
                })
                .collect(),
        }
    }

    /// Index of the option `user_id` currently votes for.
    pub fn voted_for(&self, user_id: &UserId) -> Option<usize> {
        self.options.iter().position(|o| o.votes.contains(user_id))
    }

    /// Vote for `option_index`, keeping at most one active vote per user.
    ///
    /// The index is checked before anything changes.
    pub fn vote(&mut self, option_index: usize, user_id: &UserId) -> Result<VoteOutcome> {
        if option_index >= self.options.len() {
            return Err(StoreError::InvalidOption {
                index: option_index,
                len: self.options.len(),
            });
        }

        match self.voted_for(user_id) {
            Some(current) if current == option_index => {
                self.options[current].votes.remove(user_id);
                Ok(VoteOutcome::Retracted)
            }
            Some(current) => {
                self.options[current].votes.remove(user_id);
                self.options[option_index].votes.insert(user_id.clone());
                Ok(VoteOutcome::Moved { from: current })
            }
            None => {
                self.options[option_index].votes.insert(user_id.clone());
                Ok(VoteOutcome::Cast)
            }
        }
    }

    /// Keep only each voter's first vote (lowest option index). Returns
    /// how many extra votes were removed.
    pub fn dedupe_votes(&mut self) -> usize {
        let mut seen = BTreeSet::new();
        let mut removed = 0;
        for option in &mut self.options {
            let before = option.votes.len();
            option.votes.retain(|voter| seen.insert(voter.clone()));
            removed += before - option.votes.len();
        }
        removed
    }

    pub fn total_votes(&self) -> usize {
        self.options.iter().map(|o| o.votes.len()).sum()
    }
}

impl Message {
    pub fn poll(&self) -> Option<&Poll> {
        match &self.body {
            MessageBody::Poll(poll) => Some(poll),
            _ => None,
        }
    }

    /// Mutable poll payload, `NotAPoll` for any other body.
    pub fn poll_mut(&mut self) -> Result<&mut Poll> {
        match &mut self.body {
            MessageBody::Poll(poll) => Ok(poll),
            _ => Err(StoreError::NotAPoll(self.id.clone())),
        }
    }
}
