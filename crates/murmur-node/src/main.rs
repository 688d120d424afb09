//! # murmur-node
//!
//! Runs a Murmur engine as a standalone process.
//!
//! This binary:
//! - loads configuration from the environment
//! - seeds the demo users, groups and invitation
//! - drives the simulated peer feed on a timer
//! - polls state like a UI would and logs unread changes

mod config;
mod driver;
mod fixtures;

use std::sync::Arc;

use murmur_engine::ChatEngine;
use murmur_feed::FeedConfig;
use murmur_shared::constants::APP_NAME;
use murmur_store::User;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::NodeConfig;
use crate::driver::DriverCommand;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,murmur_engine=debug,murmur_feed=debug")),
        )
        .init();

    info!("Starting {} node v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = NodeConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Build the engine and seed demo state
    // -----------------------------------------------------------------------
    let local_user = fixtures::demo_user(&config.local_user_id)
        .unwrap_or_else(|| User::new(config.local_user_id.as_str(), config.local_user_id.as_str(), ""));
    let feed_config = FeedConfig {
        local_user: local_user.id.clone(),
        message_probability: config.peer_message_probability,
        max_delivery_delay: config.max_delivery_delay_ticks,
    };
    let engine = Arc::new(ChatEngine::with_feed_config(local_user, feed_config, config.feed_seed)?);
    fixtures::seed_demo(&engine)?;

    let summaries = engine.group_summaries()?;
    info!(
        groups = summaries.len(),
        unread = engine.total_unread()?,
        invitations = engine.pending_invitations()?.len(),
        "Demo state loaded"
    );

    // -----------------------------------------------------------------------
    // 4. Spawn background tasks
    // -----------------------------------------------------------------------
    let driver = if config.feed_enabled {
        Some(driver::spawn_feed_driver(engine.clone(), config.feed_interval))
    } else {
        info!("Peer feed disabled");
        None
    };
    let poller = driver::spawn_poller(engine.clone(), config.poll_interval);

    // -----------------------------------------------------------------------
    // 5. Run until Ctrl+C
    // -----------------------------------------------------------------------
    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl+C, shutting down");

    if let Some((cmd_tx, handle)) = driver {
        let _ = cmd_tx.send(DriverCommand::Shutdown).await;
        handle.await?;
    }
    poller.abort();

    let leftover = engine.flush_peer_simulation();
    info!(delivered = leftover.len(), "Flushed delayed peer activity");

    Ok(())
}
