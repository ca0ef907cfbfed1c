//! Status resolution and interaction gating for a single pond snapshot.
//!
//! A pond's lifecycle is driven by two independent clocks: the start and
//! end times stored in the contract, and the wall-clock UTC marks of its
//! cadence. This module is the one place where the two are reconciled.

use crate::clock;
use crate::state::{Cadence, PondSnapshot};
use crate::{UnixTimestamp, FIVE_MIN_PERIOD, POST_BOUNDARY_GUARD, PRE_BOUNDARY_GUARD};

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

/// Discrete lifecycle state of a pond, derived anew from a snapshot and a
/// caller-supplied timestamp on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub enum PondStatus {
    /// The pond has no meaningful timestamps yet, or has not opened.
    NotStarted,
    /// Deposits are accepted.
    Open,
    /// The cycle has ended and winner selection is pending for the given
    /// number of seconds.
    TimeLocked { remaining: UnixTimestamp },
    /// The timelock has expired; a winner-selection transaction must be
    /// submitted before the pond can move on.
    SelectWinner,
    /// The pond has ended and its prize has been paid out.
    Completed,
}

/// Resolves the pond's current status.
///
/// Five-minute ponds ignore the contract end time entirely: their
/// authoritative cycle is anchored to wall-clock UTC five-minute marks, and
/// the stored end time drifts from it between winner selections. The
/// reconciliation rule is that the contract has settled into the wall cycle
/// containing `now` iff its recorded start time is no older than that
/// cycle's start. An unsettled pond still owes a winner selection for the
/// elapsed cycle and reports `TimeLocked` and then `SelectWinner` until the
/// contract catches up, so a stale end time can never freeze the displayed
/// state. Five-minute ponds cycle indefinitely and never report
/// `Completed`.
///
/// Malformed snapshots resolve to `NotStarted`; this function never fails.
pub fn resolve_status(
    snapshot: &PondSnapshot,
    now: UnixTimestamp,
    timelock: UnixTimestamp,
) -> PondStatus {
    if snapshot.start_time <= 0 || snapshot.end_time <= 0 || now < snapshot.start_time {
        return PondStatus::NotStarted;
    }

    match snapshot.cadence {
        Cadence::FiveMin => {
            let boundary = match clock::next_boundary(Cadence::FiveMin, now) {
                Some(boundary) => boundary,
                None => return PondStatus::NotStarted,
            };
            let cycle_head = boundary - FIVE_MIN_PERIOD;
            if snapshot.start_time >= cycle_head {
                PondStatus::Open
            } else if now < cycle_head + timelock {
                PondStatus::TimeLocked {
                    remaining: cycle_head + timelock - now,
                }
            } else {
                PondStatus::SelectWinner
            }
        }
        _ => {
            if now > snapshot.end_time {
                if snapshot.prize_distributed {
                    PondStatus::Completed
                } else {
                    let timelock_end = snapshot.end_time + timelock;
                    if now < timelock_end {
                        PondStatus::TimeLocked {
                            remaining: timelock_end - now,
                        }
                    } else {
                        PondStatus::SelectWinner
                    }
                }
            } else {
                PondStatus::Open
            }
        }
    }
}

/// Resolves the pond's status with the cadence's default timelock.
pub fn resolve_status_with_defaults(snapshot: &PondSnapshot, now: UnixTimestamp) -> PondStatus {
    resolve_status(snapshot, now, snapshot.cadence.default_timelock())
}

/// The instant the pond's current cycle is scheduled to end: the next
/// wall-clock boundary for five-minute ponds, the stored end time for every
/// other cadence.
pub fn effective_boundary(snapshot: &PondSnapshot, now: UnixTimestamp) -> Option<UnixTimestamp> {
    match snapshot.cadence {
        Cadence::FiveMin => clock::next_boundary(Cadence::FiveMin, now),
        _ if snapshot.end_time > 0 => Some(snapshot.end_time),
        _ => None,
    }
}

/// Seconds until the next relevant event: the cycle boundary while the pond
/// is open, the lock expiry while it is timelocked.
pub fn time_remaining(
    snapshot: &PondSnapshot,
    status: PondStatus,
    now: UnixTimestamp,
) -> Option<UnixTimestamp> {
    match status {
        PondStatus::Open => effective_boundary(snapshot, now).map(|boundary| boundary - now),
        PondStatus::TimeLocked { remaining } => Some(remaining),
        _ => None,
    }
}

/// Whether `now` falls in a window around a cycle edge during which
/// deposits must not be submitted.
///
/// The gated windows are the last [`PRE_BOUNDARY_GUARD`] seconds before the
/// effective boundary and the first [`POST_BOUNDARY_GUARD`] seconds after a
/// cycle starts or a boundary is crossed. A deposit submitted inside them
/// could land in a different cycle than the one on screen.
pub fn in_disable_window(snapshot: &PondSnapshot, now: UnixTimestamp) -> bool {
    match snapshot.cadence {
        Cadence::FiveMin => match clock::next_boundary(Cadence::FiveMin, now) {
            Some(boundary) => {
                let cycle_head = boundary - FIVE_MIN_PERIOD;
                boundary - now <= PRE_BOUNDARY_GUARD || now - cycle_head < POST_BOUNDARY_GUARD
            }
            None => false,
        },
        _ => {
            if snapshot.end_time <= 0 {
                return false;
            }
            let after_start = snapshot.start_time > 0
                && now >= snapshot.start_time
                && now - snapshot.start_time < POST_BOUNDARY_GUARD;
            let before_end =
                now < snapshot.end_time && snapshot.end_time - now <= PRE_BOUNDARY_GUARD;
            let after_end =
                now >= snapshot.end_time && now - snapshot.end_time < POST_BOUNDARY_GUARD;
            after_start || before_end || after_end
        }
    }
}

/// Whether the UI must refuse deposit submissions right now.
pub fn is_interaction_disabled(
    snapshot: &PondSnapshot,
    status: PondStatus,
    now: UnixTimestamp,
) -> bool {
    matches!(status, PondStatus::TimeLocked { .. }) || in_disable_window(snapshot, now)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::state::{pad_to_32_bytes, TokenConfig};
    use crate::FIVE_MIN_SELECTION_TIMELOCK;

    fn snapshot(cadence: Cadence, start_time: UnixTimestamp, end_time: UnixTimestamp) -> PondSnapshot {
        PondSnapshot {
            name: pad_to_32_bytes("test-pond").unwrap(),
            start_time,
            end_time,
            cadence,
            prize_distributed: false,
            min_deposit: 1,
            max_total_deposit: 0,
            total_deposits: 0,
            total_value: 0,
            total_participants: 0,
            token_config: TokenConfig::Native,
        }
    }

    #[test]
    fn malformed_snapshots_resolve_to_not_started() {
        assert_eq!(
            resolve_status(&snapshot(Cadence::Daily, 0, 2000), 1500, 60),
            PondStatus::NotStarted
        );
        assert_eq!(
            resolve_status(&snapshot(Cadence::Daily, 1000, 0), 1500, 60),
            PondStatus::NotStarted
        );
        assert_eq!(
            resolve_status(&snapshot(Cadence::Daily, 1000, 2000), 999, 60),
            PondStatus::NotStarted
        );
        assert_eq!(
            resolve_status(&snapshot(Cadence::FiveMin, 0, 0), 1500, 20),
            PondStatus::NotStarted
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let pond = snapshot(Cadence::Daily, 1000, 2000);
        let first = resolve_status(&pond, 2030, 60);
        for _ in 0..10 {
            assert_eq!(resolve_status(&pond, 2030, 60), first);
        }
    }

    #[test]
    fn daily_pond_walks_through_its_lifecycle() {
        let mut pond = snapshot(Cadence::Daily, 1000, 2000);
        assert_eq!(resolve_status(&pond, 1500, 60), PondStatus::Open);
        assert_eq!(resolve_status(&pond, 2000, 60), PondStatus::Open);
        assert_eq!(
            resolve_status(&pond, 2030, 60),
            PondStatus::TimeLocked { remaining: 30 }
        );
        // the cadence default matches the explicit 60 s lock
        assert_eq!(
            resolve_status_with_defaults(&pond, 2030),
            PondStatus::TimeLocked { remaining: 30 }
        );
        assert_eq!(resolve_status(&pond, 2100, 60), PondStatus::SelectWinner);
        pond.prize_distributed = true;
        assert_eq!(resolve_status(&pond, 2100, 60), PondStatus::Completed);
    }

    #[test]
    fn five_min_pond_ignores_the_contract_end_time() {
        // settled into the wall cycle [1200, 1500), despite a stale end time
        let pond = snapshot(Cadence::FiveMin, 1200, 900);
        assert_eq!(resolve_status(&pond, 1400, 20), PondStatus::Open);
    }

    #[test]
    fn five_min_timelock_window() {
        // the pond last settled into the cycle [900, 1200)
        let pond = snapshot(Cadence::FiveMin, 900, 1200);
        let timelock = FIVE_MIN_SELECTION_TIMELOCK;
        assert_eq!(resolve_status(&pond, 1199, timelock), PondStatus::Open);
        // exactly at the boundary the full timelock remains
        assert_eq!(
            resolve_status(&pond, 1200, timelock),
            PondStatus::TimeLocked { remaining: 20 }
        );
        assert_eq!(
            resolve_status(&pond, 1219, timelock),
            PondStatus::TimeLocked { remaining: 1 }
        );
        assert_eq!(
            resolve_status(&pond, 1220, timelock),
            PondStatus::SelectWinner
        );
    }

    #[test]
    fn five_min_ponds_never_complete() {
        let mut pond = snapshot(Cadence::FiveMin, 900, 1200);
        pond.prize_distributed = true;
        for now in (900..3000).step_by(7) {
            assert_ne!(resolve_status(&pond, now, 20), PondStatus::Completed);
        }
    }

    #[test]
    fn five_min_transitions_are_monotonic() {
        fn label(status: PondStatus) -> &'static str {
            match status {
                PondStatus::NotStarted => "not-started",
                PondStatus::Open => "open",
                PondStatus::TimeLocked { .. } => "time-locked",
                PondStatus::SelectWinner => "select-winner",
                PondStatus::Completed => "completed",
            }
        }

        // sweep a full cycle second by second, selecting the winner as soon
        // as the pond asks for it
        let mut pond = snapshot(Cadence::FiveMin, 1200, 1500);
        let mut observed: Vec<&str> = vec![];
        for now in 1200..1600 {
            let status = resolve_status(&pond, now, 20);
            if observed.last() != Some(&label(status)) {
                observed.push(label(status));
            }
            if status == PondStatus::SelectWinner {
                // the selection transaction rolls the contract forward
                pond.start_time = 1500;
                pond.end_time = 1800;
            }
        }
        assert_eq!(
            observed,
            vec!["open", "time-locked", "select-winner", "open"]
        );
    }

    #[test]
    fn time_remaining_counts_toward_the_next_event() {
        let pond = snapshot(Cadence::FiveMin, 1200, 1500);
        let status = resolve_status(&pond, 1400, 20);
        assert_eq!(status, PondStatus::Open);
        assert_eq!(time_remaining(&pond, status, 1400), Some(100));

        let daily = snapshot(Cadence::Daily, 1000, 2000);
        let status = resolve_status(&daily, 2030, 60);
        assert_eq!(time_remaining(&daily, status, 2030), Some(30));
        assert_eq!(time_remaining(&daily, PondStatus::SelectWinner, 2100), None);
    }

    #[test]
    fn disable_window_brackets_the_end_time() {
        let pond = snapshot(Cadence::Daily, 10_000, 86_400);
        let end = pond.end_time;
        assert!(!in_disable_window(&pond, end - 11));
        assert!(in_disable_window(&pond, end - 10));
        assert!(in_disable_window(&pond, end - 1));
        assert!(in_disable_window(&pond, end));
        assert!(in_disable_window(&pond, end + 24));
        assert!(!in_disable_window(&pond, end + 25));
        assert!(!in_disable_window(&pond, end + 26));
    }

    #[test]
    fn disable_window_covers_the_cycle_start() {
        let pond = snapshot(Cadence::Daily, 10_000, 86_400);
        assert!(in_disable_window(&pond, 10_000));
        assert!(in_disable_window(&pond, 10_024));
        assert!(!in_disable_window(&pond, 10_025));
        // five-minute ponds gate the first seconds of every wall cycle
        let five_min = snapshot(Cadence::FiveMin, 1200, 1500);
        assert!(in_disable_window(&five_min, 1200));
        assert!(in_disable_window(&five_min, 1224));
        assert!(!in_disable_window(&five_min, 1225));
        assert!(in_disable_window(&five_min, 1490));
        assert!(!in_disable_window(&five_min, 1489));
    }

    #[cfg(feature = "client")]
    #[test]
    fn status_serializes_for_the_frontend() {
        let status = PondStatus::TimeLocked { remaining: 12 };
        let json = serde_json::to_string(&status).unwrap();
        let parsed: PondStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, parsed);
    }

    #[test]
    fn timelock_always_disables_interaction() {
        let pond = snapshot(Cadence::Daily, 1000, 2000);
        let status = resolve_status(&pond, 2030, 60);
        assert!(is_interaction_disabled(&pond, status, 2030));
        // mid-cycle, far from every edge
        let status = resolve_status(&pond, 1500, 60);
        assert!(!is_interaction_disabled(&pond, status, 1500));
    }
}
