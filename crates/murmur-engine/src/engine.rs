//! The engine instance shared by every caller.
//!
//! [`ChatEngine`] is constructed explicitly and passed around by reference
//! (or `Arc`); there is no global state. Operations live in the
//! [`commands`](crate::commands) modules as `impl ChatEngine` blocks.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{error, info};

use murmur_feed::{FeedConfig, FeedEvent, PeerFeed};
use murmur_shared::UserId;
use murmur_store::{EntityStore, StoreError, User};

use crate::error::{EngineError, Result};
use crate::invite::Invitation;

/// Central engine state.
///
/// Holds the canonical store, the identity of the local user, the peer
/// feed standing in for remote traffic, and the local invitation inbox.
pub struct ChatEngine {
    /// Canonical users/groups/messages.
    pub(crate) store: Arc<EntityStore>,

    /// The user on whose behalf local commands run.
    pub(crate) local_user: UserId,

    /// Synthetic remote activity, stepped by the host.
    pub(crate) feed: Mutex<PeerFeed>,

    /// Invitations received but not yet accepted or declined.
    pub(crate) invitations: Mutex<Vec<Invitation>>,
}

impl ChatEngine {
    /// Create an engine for `local_user` with a default, entropy-seeded feed.
    pub fn new(local_user: User) -> Result<Self> {
        Self::with_feed_config(local_user, FeedConfig::default(), None)
    }

    /// Create an engine with an explicit feed configuration. A `seed` makes
    /// the simulated peer activity reproducible.
    pub fn with_feed_config(local_user: User, mut config: FeedConfig, seed: Option<u64>) -> Result<Self> {
        config.local_user = local_user.id.clone();
        let feed = match seed {
            Some(seed) => PeerFeed::seeded(config, seed),
            None => PeerFeed::new(config),
        };

        let store = Arc::new(EntityStore::new());
        let local_id = local_user.id.clone();
        store.upsert_user(local_user)?;

        info!(local_user = %local_id, seeded = seed.is_some(), "Engine created");

        Ok(Self {
            store,
            local_user: local_id,
            feed: Mutex::new(feed),
            invitations: Mutex::new(Vec::new()),
        })
    }

    pub fn local_user_id(&self) -> &UserId {
        &self.local_user
    }

    /// Current directory entry of the local user.
    pub fn local_user(&self) -> Result<User> {
        self.store
            .user(&self.local_user)?
            .ok_or_else(|| StoreError::UserNotFound(self.local_user.clone()).into())
    }

    /// Shared handle to the canonical store.
    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    /// Register a user in the directory so the feed can impersonate them.
    pub fn register_user(&self, user: User) -> Result<()> {
        Ok(self.store.upsert_user(user)?)
    }

    // ------------------------------------------------------------------
    // Peer simulation
    // ------------------------------------------------------------------

    /// Run one activation of the simulated peer feed. Returns the events
    /// that reached canonical state; never fails.
    pub fn tick_peer_simulation(&self) -> Vec<FeedEvent> {
        match self.feed.lock() {
            Ok(mut feed) => feed.tick(&self.store),
            Err(_) => {
                error!("Peer feed lock poisoned, skipping activation");
                Vec::new()
            }
        }
    }

    /// Deliver every synthetic event still held back by the feed.
    pub fn flush_peer_simulation(&self) -> Vec<FeedEvent> {
        match self.feed.lock() {
            Ok(mut feed) => feed.flush(&self.store),
            Err(_) => {
                error!("Peer feed lock poisoned, skipping flush");
                Vec::new()
            }
        }
    }

    pub(crate) fn inbox(&self) -> Result<MutexGuard<'_, Vec<Invitation>>> {
        self.invitations.lock().map_err(|_| EngineError::from(StoreError::LockPoisoned))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_local_user_registered() {
        let engine = engine();
        assert_eq!(engine.local_user().unwrap(), you());
        assert_eq!(engine.local_user_id(), &UserId::from("user-1"));
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChatEngine>();
    }

    #[test]
    fn test_tick_without_shared_group_changes_nothing() {
        // user-2 is known, but shares no group with anyone.
        let lonely = engine_with(1.0);
        lonely.register_user(alex()).unwrap();
        lonely.create_group("Solo", vec![you()], Vec::new()).unwrap();

        let before = lonely.get_state().unwrap();
        for _ in 0..10 {
            assert!(lonely.tick_peer_simulation().is_empty());
        }
        assert_eq!(lonely.get_state().unwrap(), before);
    }

    #[test]
    fn test_tick_with_shared_group_delivers() {
        let busy = engine_with(1.0);
        let group = busy.create_group("Phoenix", vec![you(), alex()], Vec::new()).unwrap();

        let events = busy.tick_peer_simulation();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].peer(), &alex().id);

        let state = busy.get_state().unwrap();
        assert_eq!(state[0].id, group.id);
        assert_eq!(state[0].messages.len(), 1);
        assert!(busy.flush_peer_simulation().is_empty());
    }
}
