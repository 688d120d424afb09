/// Application name
pub const APP_NAME: &str = "Murmur";

/// Author id of engine-generated (system) messages
pub const SYSTEM_AUTHOR_ID: &str = "system";

/// Default id of the local user in the demo fixture
pub const DEFAULT_LOCAL_USER_ID: &str = "user-1";

/// Probability that a feed activation produces a message rather than a read receipt
pub const DEFAULT_PEER_MESSAGE_PROBABILITY: f64 = 1.0 / 3.0;

/// Phrases remote peers pick from when the feed synthesizes a message
pub const PEER_PHRASES: [&str; 4] = [
    "Just checking in on this.",
    "Looks good, thanks!",
    "I'll review this shortly.",
    "Let's sync up on this tomorrow.",
];

/// Default feed activation interval of the host, in milliseconds
pub const DEFAULT_FEED_INTERVAL_MS: u64 = 4_000;

/// Default snapshot poll interval of the host, in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;

/// Length of the last-message preview in group summaries (characters)
pub const PREVIEW_CHARS: usize = 48;

/// Poll option bounds (after dropping blank options)
pub const POLL_MIN_OPTIONS: usize = 2;
pub const POLL_MAX_OPTIONS: usize = 6;
