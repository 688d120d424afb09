//! Delayed delivery of synthetic events.
//!
//! Events are held in a queue until their due tick. Two events generated in
//! order can be delivered in the opposite order when the later one draws a
//! shorter delay, which is how the feed models out-of-order arrival.

use tracing::{debug, trace};

use murmur_store::{EntityStore, StoreError};

use crate::event::FeedEvent;

#[derive(Debug, Clone)]
struct Scheduled {
    due: u64,
    seq: u64,
    event: FeedEvent,
}

/// Events waiting for their delivery tick.
#[derive(Debug, Clone, Default)]
pub struct DeliveryQueue {
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl DeliveryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `event` until tick `due`.
    pub fn schedule(&mut self, event: FeedEvent, due: u64) {
        self.pending.push(Scheduled {
            due,
            seq: self.next_seq,
            event,
        });
        self.next_seq += 1;
    }

    /// Remove and return every event due at or before `now`, ordered by due
    /// tick and then by scheduling order.
    pub fn take_due(&mut self, now: u64) -> Vec<FeedEvent> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = rest;
        due.sort_by_key(|s| (s.due, s.seq));
        due.into_iter().map(|s| s.event).collect()
    }

    /// Remove and return everything, in delivery order.
    pub fn drain_all(&mut self) -> Vec<FeedEvent> {
        self.take_due(u64::MAX)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Write one event into the store.
///
/// Returns `Ok(false)` when the target vanished or the event changes
/// nothing (redelivered message, receipt already present); those are
/// expected under at-least-once delivery and are not errors.
pub fn deliver(store: &EntityStore, event: &FeedEvent) -> Result<bool, StoreError> {
    let outcome: Result<bool, StoreError> = match event {
        FeedEvent::RemoteMessage { group_id, message } => {
            store.apply_delta(group_id, |group| Ok(group.push_message(message.clone())))
        }
        FeedEvent::ReadReceipt {
            group_id,
            message_id,
            reader,
        } => store.apply_delta(group_id, |group| {
            if !group.is_member(reader) {
                return Ok(false);
            }
            Ok(group.message_mut(message_id)?.mark_read(reader))
        }),
    };

    match outcome {
        Ok(applied) => {
            debug!(group = %event.group_id(), peer = %event.peer(), applied, "Delivered feed event");
            Ok(applied)
        }
        Err(StoreError::GroupNotFound(_)) | Err(StoreError::MessageNotFound(_)) => {
            trace!(group = %event.group_id(), "Feed event target gone, dropping");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
