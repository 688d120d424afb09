//! Background tasks that stand in for a real network: the feed driver
//! steps the peer simulation on a timer, the poller reads state the way a
//! UI would.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use murmur_engine::{ChatEngine, GroupSummary};
use murmur_feed::FeedEvent;
use murmur_shared::GroupId;

/// Commands sent *to* the feed driver task.
#[derive(Debug)]
pub enum DriverCommand {
    /// Run one activation now and report what was delivered.
    Step(oneshot::Sender<Vec<FeedEvent>>),
    /// Stop timer-driven activations. `Step` keeps working.
    Pause,
    Resume,
    /// Stop the task.
    Shutdown,
}

/// Spawn the feed driver. The first timed activation happens one
/// `period` after start.
pub fn spawn_feed_driver(engine: Arc<ChatEngine>, period: Duration) -> (mpsc::Sender<DriverCommand>, JoinHandle<()>) {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<DriverCommand>(32);

    let handle = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut paused = false;

        info!(period_ms = period.as_millis() as u64, "Feed driver started");

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(DriverCommand::Step(reply)) => {
                            let events = engine.tick_peer_simulation();
                            let _ = reply.send(events);
                        }
                        Some(DriverCommand::Pause) => {
                            info!("Feed driver paused");
                            paused = true;
                        }
                        Some(DriverCommand::Resume) => {
                            info!("Feed driver resumed");
                            paused = false;
                        }
                        Some(DriverCommand::Shutdown) => {
                            info!("Feed driver shutdown requested");
                            break;
                        }
                        None => {
                            info!("Command channel closed, stopping feed driver");
                            break;
                        }
                    }
                }

                _ = ticker.tick(), if !paused => {
                    for event in engine.tick_peer_simulation() {
                        debug!(group = %event.group_id(), peer = %event.peer(), "Peer activity delivered");
                    }
                }
            }
        }
    });

    (cmd_tx, handle)
}

/// Groups whose unread count differs from `previous`, with the old count
/// (`0` for groups not seen before). Updates `previous` in place.
pub fn unread_changes(
    previous: &mut HashMap<GroupId, usize>,
    summaries: &[GroupSummary],
) -> Vec<(GroupId, usize, usize)> {
    let mut changes = Vec::new();
    for summary in summaries {
        let before = previous.insert(summary.id.clone(), summary.unread_count).unwrap_or(0);
        if before != summary.unread_count {
            changes.push((summary.id.clone(), before, summary.unread_count));
        }
    }
    changes
}

/// Spawn the poller: fetch group summaries every `period` and log unread
/// changes.
pub fn spawn_poller(engine: Arc<ChatEngine>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut seen = HashMap::new();

        loop {
            ticker.tick().await;
            let summaries = match engine.group_summaries() {
                Ok(summaries) => summaries,
                Err(e) => {
                    error!(error = %e, "State poll failed");
                    continue;
                }
            };
            for (group, before, after) in unread_changes(&mut seen, &summaries) {
                let name = summaries
                    .iter()
                    .find(|s| s.id == group)
                    .map(|s| s.name.as_str())
                    .unwrap_or_default();
                info!(group = %group, group_name = name, before, after, "Unread count changed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use murmur_feed::FeedConfig;
    use murmur_store::User;

    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    /// Engine with one shared group and a feed that always posts.
    fn chatty() -> (Arc<ChatEngine>, GroupId) {
        let config = FeedConfig {
            message_probability: 1.0,
            ..FeedConfig::default()
        };
        let engine = ChatEngine::with_feed_config(User::new("user-1", "You", ""), config, Some(9)).unwrap();
        let group = engine
            .create_group("Phoenix", vec![User::new("user-1", "You", ""), User::new("user-2", "Alex", "")], Vec::new())
            .unwrap();
        (Arc::new(engine), group.id)
    }

    async fn step(tx: &mpsc::Sender<DriverCommand>) -> Vec<FeedEvent> {
        let (reply_tx, reply_rx) = oneshot::channel();
        tx.send(DriverCommand::Step(reply_tx)).await.unwrap();
        reply_rx.await.unwrap()
    }

    #[tokio::test]
    async fn test_step_delivers() {
        let (engine, group) = chatty();
        let (tx, handle) = spawn_feed_driver(engine.clone(), HOUR);

        let events = step(&tx).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].group_id(), &group);
        assert_eq!(engine.get_state().unwrap()[0].messages.len(), 1);

        tx.send(DriverCommand::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_step_while_paused() {
        let (engine, _group) = chatty();
        let (tx, handle) = spawn_feed_driver(engine.clone(), HOUR);

        tx.send(DriverCommand::Pause).await.unwrap();
        assert_eq!(step(&tx).await.len(), 1);
        tx.send(DriverCommand::Resume).await.unwrap();
        assert_eq!(step(&tx).await.len(), 1);
        assert_eq!(engine.get_state().unwrap()[0].messages.len(), 2);

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_timer_drives_feed() {
        let (engine, _group) = chatty();
        let (tx, handle) = spawn_feed_driver(engine.clone(), Duration::from_millis(5));

        let mut delivered = 0;
        for _ in 0..200 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            delivered = engine.get_state().unwrap()[0].messages.len();
            if delivered > 0 {
                break;
            }
        }
        assert!(delivered > 0);

        tx.send(DriverCommand::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[test]
    fn test_unread_changes() {
        let (engine, group) = chatty();
        let mut seen = HashMap::new();

        let first = unread_changes(&mut seen, &engine.group_summaries().unwrap());
        assert!(first.is_empty());

        engine.tick_peer_simulation();
        let second = unread_changes(&mut seen, &engine.group_summaries().unwrap());
        assert_eq!(second, vec![(group.clone(), 0, 1)]);

        assert!(unread_changes(&mut seen, &engine.group_summaries().unwrap()).is_empty());
    }
}
