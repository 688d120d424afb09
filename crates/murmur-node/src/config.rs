//! Node configuration loaded from environment variables.
//!
//! Every setting has a default so the node starts with zero configuration.

use std::time::Duration;

use murmur_shared::constants::{
    DEFAULT_FEED_INTERVAL_MS, DEFAULT_LOCAL_USER_ID, DEFAULT_PEER_MESSAGE_PROBABILITY, DEFAULT_POLL_INTERVAL_MS,
};
use tracing::warn;

/// Node configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    /// Id of the user this node acts for.
    /// Env: `LOCAL_USER_ID`
    /// Default: `user-1`
    pub local_user_id: String,

    /// Period of the simulated peer feed.
    /// Env: `FEED_INTERVAL_MS`
    /// Default: 4000 ms
    pub feed_interval: Duration,

    /// Period of the state poll.
    /// Env: `POLL_INTERVAL_MS`
    /// Default: 3000 ms
    pub poll_interval: Duration,

    /// Seed for reproducible peer activity.
    /// Env: `FEED_SEED`
    /// Default: none (seeded from entropy)
    pub feed_seed: Option<u64>,

    /// Chance that a feed activation is a message rather than a receipt.
    /// Env: `PEER_MESSAGE_PROBABILITY` (0.0 to 1.0)
    /// Default: 1/3
    pub peer_message_probability: f64,

    /// Maximum delivery delay of synthetic events, in feed ticks.
    /// Env: `MAX_DELIVERY_DELAY_TICKS`
    /// Default: `0`
    pub max_delivery_delay_ticks: u32,

    /// Whether the feed driver runs at all.
    /// Env: `FEED_ENABLED` (true/false)
    /// Default: `true`
    pub feed_enabled: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            local_user_id: DEFAULT_LOCAL_USER_ID.to_string(),
            feed_interval: Duration::from_millis(DEFAULT_FEED_INTERVAL_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            feed_seed: None,
            peer_message_probability: DEFAULT_PEER_MESSAGE_PROBABILITY,
            max_delivery_delay_ticks: 0,
            feed_enabled: true,
        }
    }
}

impl NodeConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(id) = lookup("LOCAL_USER_ID") {
            let id = id.trim();
            if id.is_empty() {
                warn!("Empty LOCAL_USER_ID, using default");
            } else {
                config.local_user_id = id.to_string();
            }
        }

        if let Some(val) = lookup("FEED_INTERVAL_MS") {
            match parse_interval(&val) {
                Some(interval) => config.feed_interval = interval,
                None => warn!(value = %val, "Invalid FEED_INTERVAL_MS, using default"),
            }
        }

        if let Some(val) = lookup("POLL_INTERVAL_MS") {
            match parse_interval(&val) {
                Some(interval) => config.poll_interval = interval,
                None => warn!(value = %val, "Invalid POLL_INTERVAL_MS, using default"),
            }
        }

        if let Some(val) = lookup("FEED_SEED") {
            match val.trim().parse::<u64>() {
                Ok(seed) => config.feed_seed = Some(seed),
                Err(_) => warn!(value = %val, "Invalid FEED_SEED, seeding from entropy"),
            }
        }

        if let Some(val) = lookup("PEER_MESSAGE_PROBABILITY") {
            match val.trim().parse::<f64>() {
                Ok(p) if (0.0..=1.0).contains(&p) => config.peer_message_probability = p,
                _ => warn!(value = %val, "Invalid PEER_MESSAGE_PROBABILITY, using default"),
            }
        }

        if let Some(val) = lookup("MAX_DELIVERY_DELAY_TICKS") {
            match val.trim().parse::<u32>() {
                Ok(n) => config.max_delivery_delay_ticks = n,
                Err(_) => warn!(value = %val, "Invalid MAX_DELIVERY_DELAY_TICKS, using default"),
            }
        }

        if let Some(val) = lookup("FEED_ENABLED") {
            config.feed_enabled = val != "false" && val != "0";
        }

        // RUST_LOG is read by tracing-subscriber's EnvFilter directly.

        config
    }
}

/// Milliseconds to a non-zero interval.
fn parse_interval(val: &str) -> Option<Duration> {
    match val.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
        _ => None,
    }
}
