use crate::clock::Clock;
use crate::interval::poll_interval;
use crate::reader::PondReader;
use crate::watcher::{PondWatcher, WatcherEvent, WatcherSignals};

use lucky_ponds_core::state::PondId;

use log::{error, warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use std::sync::Arc;

/// Seconds to wait before retrying after a failed snapshot fetch.
const FETCH_RETRY_POLL: u64 = 5;
/// Consecutive fetch failures tolerated before a warning is logged.
const ERROR_STREAK_WARN_THRESHOLD: u32 = 5;

/// Scoped handle over a running pond polling task.
///
/// The task is aborted by [`stop`](PollHandle::stop) and when the handle is
/// dropped, so a watcher can never outlive the pond selection that created
/// it.
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stops the polling task.
    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawns the polling loop for one pond.
///
/// Returns the scoped handle plus the receiving end of the signal channel.
/// Events go out through `events` fire-and-forget: a tick never waits on
/// their consumers, and a failing consumer never stalls the loop. Snapshot
/// fetch errors are logged and retried; they never terminate the task.
pub fn start_pond_watcher<R, C>(
    reader: Arc<R>,
    clock: Arc<C>,
    pond_id: PondId,
    events: mpsc::UnboundedSender<WatcherEvent>,
) -> (PollHandle, watch::Receiver<WatcherSignals>)
where
    R: PondReader + 'static,
    C: Clock + 'static,
{
    let (signal_tx, signal_rx) = watch::channel(WatcherSignals::default());
    let task = tokio::spawn(async move {
        run_pond_watcher(reader, clock, pond_id, signal_tx, events).await;
    });
    (PollHandle { task }, signal_rx)
}

async fn run_pond_watcher<R, C>(
    reader: Arc<R>,
    clock: Arc<C>,
    pond_id: PondId,
    signals: watch::Sender<WatcherSignals>,
    events: mpsc::UnboundedSender<WatcherEvent>,
) where
    R: PondReader,
    C: Clock,
{
    // fetched once; the timelock duration rarely changes
    let timelock_override = match reader.selection_timelock().await {
        Ok(timelock) => Some(timelock),
        Err(err) => {
            warn!(
                "pond \"{}\" timelock fetch failed, using cadence defaults: {}",
                String::from_utf8_lossy(&pond_id),
                err
            );
            None
        }
    };

    let mut watcher: Option<PondWatcher> = None;
    let mut error_streak: u32 = 0;
    loop {
        let now = clock.now();
        let snapshot = match reader.get_pond_status(&pond_id).await {
            Ok(snapshot) => {
                error_streak = 0;
                snapshot
            }
            Err(err) => {
                error_streak += 1;
                error!(
                    "pond \"{}\" snapshot fetch failed: {}",
                    String::from_utf8_lossy(&pond_id),
                    err
                );
                if error_streak == ERROR_STREAK_WARN_THRESHOLD {
                    warn!(
                        "pond \"{}\" has been unreadable for {} consecutive polls",
                        String::from_utf8_lossy(&pond_id),
                        error_streak
                    );
                }
                clock.sleep(FETCH_RETRY_POLL).await;
                continue;
            }
        };

        let watcher = watcher.get_or_insert_with(|| {
            let timelock =
                timelock_override.unwrap_or_else(|| snapshot.cadence.default_timelock());
            PondWatcher::new(pond_id, timelock)
        });
        let (tick_signals, tick_events) = watcher.tick(&snapshot, now);

        // send failures mean every consumer is gone; teardown is owned by
        // the poll handle, so keep ticking until it aborts us
        signals.send(tick_signals).ok();
        for event in tick_events {
            events.send(event).ok();
        }

        clock
            .sleep(poll_interval(&snapshot, tick_signals.status, now))
            .await;
    }
}
