// Simulated remote-peer activity, used in place of a real transport.

pub mod delivery;
pub mod event;
pub mod simulator;

pub use delivery::DeliveryQueue;
pub use event::FeedEvent;
pub use simulator::{FeedConfig, PeerFeed};
