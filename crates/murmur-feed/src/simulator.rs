//! The simulated peer feed.
//!
//! Stands in for a real transport: every activation picks a remote peer and
//! either has it post a message or read one. Activation is explicit
//! ([`PeerFeed::tick`]); wall-clock scheduling belongs to the host.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, trace};

use murmur_shared::constants::{DEFAULT_LOCAL_USER_ID, DEFAULT_PEER_MESSAGE_PROBABILITY, PEER_PHRASES};
use murmur_shared::UserId;
use murmur_store::{EntityStore, Message, MessageBody, StoreError};

use crate::delivery::{self, DeliveryQueue};
use crate::event::FeedEvent;

/// Tuning knobs of the feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// The user driving the local client; never impersonated by the feed.
    pub local_user: UserId,
    /// Chance that an activation produces a message instead of a receipt.
    pub message_probability: f64,
    /// Upper bound (inclusive) of the random delivery delay, in ticks.
    /// `0` delivers every event on the tick that produced it.
    pub max_delivery_delay: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            local_user: UserId::from(DEFAULT_LOCAL_USER_ID),
            message_probability: DEFAULT_PEER_MESSAGE_PROBABILITY,
            max_delivery_delay: 0,
        }
    }
}

impl FeedConfig {
    pub fn for_local_user(local_user: UserId) -> Self {
        Self {
            local_user,
            ..Self::default()
        }
    }

    fn probability(&self) -> f64 {
        if self.message_probability.is_nan() {
            DEFAULT_PEER_MESSAGE_PROBABILITY
        } else {
            self.message_probability.clamp(0.0, 1.0)
        }
    }
}

/// Generator of synthetic remote activity.
#[derive(Debug)]
pub struct PeerFeed<R = StdRng> {
    config: FeedConfig,
    rng: R,
    tick: u64,
    queue: DeliveryQueue,
}

impl PeerFeed<StdRng> {
    /// Feed seeded from OS entropy.
    pub fn new(config: FeedConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Reproducible feed.
    pub fn seeded(config: FeedConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PeerFeed<R> {
    pub fn with_rng(config: FeedConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            tick: 0,
            queue: DeliveryQueue::new(),
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Number of activations so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Events synthesized but not yet delivered.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Run one activation and deliver every event that is now due.
    ///
    /// Returns the events that reached the store. Finding nothing to do is
    /// the normal steady state and yields an empty list.
    pub fn tick(&mut self, store: &EntityStore) -> Vec<FeedEvent> {
        self.tick += 1;

        match self.synthesize(store) {
            Ok(Some(event)) => {
                let delay = match self.config.max_delivery_delay {
                    0 => 0,
                    max => self.rng.gen_range(0..=max),
                };
                trace!(tick = self.tick, delay, peer = %event.peer(), "Scheduled feed event");
                self.queue.schedule(event, self.tick + u64::from(delay));
            }
            Ok(None) => trace!(tick = self.tick, "No eligible peer activity"),
            Err(e) => error!(error = %e, "Peer feed could not read the store"),
        }

        let due = self.queue.take_due(self.tick);
        self.deliver_all(store, due)
    }

    /// Deliver everything still pending, regardless of delay.
    pub fn flush(&mut self, store: &EntityStore) -> Vec<FeedEvent> {
        let all = self.queue.drain_all();
        self.deliver_all(store, all)
    }

    fn deliver_all(&self, store: &EntityStore, events: Vec<FeedEvent>) -> Vec<FeedEvent> {
        events
            .into_iter()
            .filter(|event| match delivery::deliver(store, event) {
                Ok(applied) => applied,
                Err(e) => {
                    error!(error = %e, "Failed to deliver feed event");
                    false
                }
            })
            .collect()
    }

    /// Decide what a random peer does, without touching canonical state.
    fn synthesize(&mut self, store: &EntityStore) -> Result<Option<FeedEvent>, StoreError> {
        let local = &self.config.local_user;
        let probability = self.config.probability();
        let rng = &mut self.rng;

        store.read(|groups, users| {
            let peers: Vec<&UserId> = users
                .keys()
                .filter(|id| *id != local && !id.is_system())
                .collect();
            let peer = (*peers.choose(rng)?).clone();

            if rng.gen_bool(probability) {
                let peer_groups: Vec<_> = groups.iter().filter(|g| g.is_member(&peer)).collect();
                let group = peer_groups.choose(rng)?;
                let phrase = PEER_PHRASES.choose(rng)?;

                debug!(peer = %peer, group = %group.id, "Peer composes a message");
                Some(FeedEvent::RemoteMessage {
                    group_id: group.id.clone(),
                    message: Message::new(peer, *phrase, MessageBody::Text),
                })
            } else {
                let (group, unread) = groups.iter().find_map(|g| {
                    if !g.is_member(&peer) {
                        return None;
                    }
                    g.oldest_unread(&peer).map(|m| (g, m))
                })?;

                debug!(peer = %peer, group = %group.id, msg = %unread.id, "Peer reads a message");
                Some(FeedEvent::ReadReceipt {
                    group_id: group.id.clone(),
                    message_id: unread.id.clone(),
                    reader: peer,
                })
            }
        })
    }
}
