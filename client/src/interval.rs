use lucky_ponds_core::state::{Cadence, PondSnapshot};
use lucky_ponds_core::status::{effective_boundary, PondStatus};
use lucky_ponds_core::{UnixTimestamp, FIVE_MIN_PERIOD};

/// Seconds between ticks close to a cycle edge or inside a timelock.
pub const NEAR_BOUNDARY_POLL: u64 = 1;
/// Seconds between ticks for a five-minute pond away from its boundary.
pub const FIVE_MIN_POLL: u64 = 5;
/// Seconds between ticks for every other active pond.
pub const BASELINE_POLL: u64 = 15;
/// Seconds between ticks once a pond's prize has been distributed.
pub const DORMANT_POLL: u64 = 60;
/// Half-width of the window around a boundary polled at the tight rate.
pub const NEAR_BOUNDARY_WINDOW: UnixTimestamp = 30;

/// Picks the delay until the next tick for a pond.
///
/// Ticks tighten close to a boundary and inside a timelock so a status
/// change is observed promptly, and back off once a pond lies dormant.
pub fn poll_interval(snapshot: &PondSnapshot, status: PondStatus, now: UnixTimestamp) -> u64 {
    if snapshot.cadence != Cadence::FiveMin && snapshot.prize_distributed {
        return DORMANT_POLL;
    }
    if matches!(status, PondStatus::TimeLocked { .. }) || near_boundary(snapshot, now) {
        return NEAR_BOUNDARY_POLL;
    }
    match snapshot.cadence {
        Cadence::FiveMin => FIVE_MIN_POLL,
        _ => BASELINE_POLL,
    }
}

fn near_boundary(snapshot: &PondSnapshot, now: UnixTimestamp) -> bool {
    match effective_boundary(snapshot, now) {
        Some(boundary) => {
            if snapshot.cadence == Cadence::FiveMin {
                // the next boundary is always ahead of `now`; cover the far
                // side of the previous one as well
                boundary - now <= NEAR_BOUNDARY_WINDOW
                    || now - (boundary - FIVE_MIN_PERIOD) <= NEAR_BOUNDARY_WINDOW
            } else {
                (boundary - now).abs() <= NEAR_BOUNDARY_WINDOW
            }
        }
        None => false,
    }
}
