use lucky_ponds_core::clock::next_boundary;
use lucky_ponds_core::state::{Cadence, PondId, PondSnapshot};
use lucky_ponds_core::status::{
    is_interaction_disabled, resolve_status, time_remaining, PondStatus,
};
use lucky_ponds_core::{UnixTimestamp, FIVE_MIN_PERIOD};

/// Signals derived on each watcher tick for the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatcherSignals {
    pub status: PondStatus,
    /// Seconds until the next relevant event, when one is scheduled.
    pub time_remaining: Option<UnixTimestamp>,
    /// Deposits must not be submitted while set.
    pub interaction_disabled: bool,
}

impl Default for WatcherSignals {
    /// Signals published before the first tick: nothing is known about the
    /// pond yet, so interaction stays disabled.
    fn default() -> Self {
        Self {
            status: PondStatus::NotStarted,
            time_remaining: None,
            interaction_disabled: true,
        }
    }
}

/// Side effects requested by a watcher tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherEvent {
    /// A five-minute wall cycle rolled over since the previous tick.
    CycleRolledOver,
    /// The watched pond just entered `SelectWinner`; downstream data must
    /// be refetched.
    RefreshNeeded,
}

/// Per-pond tick state machine.
///
/// Each [`tick`](PondWatcher::tick) re-resolves the pond's status and
/// reports, besides the display signals, at most one
/// [`WatcherEvent::CycleRolledOver`] per wall-cycle rollover and at most
/// one [`WatcherEvent::RefreshNeeded`] per transition into `SelectWinner`.
/// The guards arm on the first tick without firing, reset when the cycle
/// rolls over, and clear entirely on [`rebind`](PondWatcher::rebind), so a
/// boundary crossed before the watcher was bound never fires retroactively.
pub struct PondWatcher {
    pond_id: PondId,
    timelock: UnixTimestamp,
    last_status: Option<PondStatus>,
    cycle_head: Option<UnixTimestamp>,
    refresh_fired: bool,
}

impl PondWatcher {
    pub fn new(pond_id: PondId, timelock: UnixTimestamp) -> Self {
        Self {
            pond_id,
            timelock,
            last_status: None,
            cycle_head: None,
            refresh_fired: false,
        }
    }

    /// Id of the pond this watcher is bound to.
    pub fn pond_id(&self) -> &PondId {
        &self.pond_id
    }

    /// Rebinds the watcher to another pond, clearing every trigger guard.
    pub fn rebind(&mut self, pond_id: PondId, timelock: UnixTimestamp) {
        *self = Self::new(pond_id, timelock);
    }

    /// Re-evaluates the pond against `now` and returns the display signals
    /// together with the events fired by this tick.
    pub fn tick(
        &mut self,
        snapshot: &PondSnapshot,
        now: UnixTimestamp,
    ) -> (WatcherSignals, Vec<WatcherEvent>) {
        let mut events = Vec::new();
        let status = resolve_status(snapshot, now, self.timelock);

        if snapshot.cadence == Cadence::FiveMin {
            if let Some(boundary) = next_boundary(Cadence::FiveMin, now) {
                let head = boundary - FIVE_MIN_PERIOD;
                // the first tick arms the guard without firing
                if let Some(recorded) = self.cycle_head {
                    if recorded != head {
                        events.push(WatcherEvent::CycleRolledOver);
                        self.refresh_fired = false;
                    }
                }
                self.cycle_head = Some(head);
            }
        }

        let entered_select_winner = matches!(
            (self.last_status, status),
            (
                Some(PondStatus::Open) | Some(PondStatus::TimeLocked { .. }),
                PondStatus::SelectWinner
            )
        );
        if entered_select_winner && !self.refresh_fired {
            events.push(WatcherEvent::RefreshNeeded);
            self.refresh_fired = true;
        }
        self.last_status = Some(status);

        let signals = WatcherSignals {
            status,
            time_remaining: time_remaining(snapshot, status, now),
            interaction_disabled: is_interaction_disabled(snapshot, status, now),
        };
        (signals, events)
    }
}
