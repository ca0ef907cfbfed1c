//! Wall-clock cycle boundaries for fixed-cadence ponds.
//!
//! Boundaries align to UTC marks: every five minutes, every hour, every UTC
//! day start, every UTC week start (Monday 00:00) and every UTC
//! calendar-month start. All computations are pure and the caller supplies
//! `now`, so the same inputs always produce the same boundary.

use crate::state::Cadence;
use crate::{UnixTimestamp, DAY_PERIOD, FIVE_MIN_PERIOD, HOUR_PERIOD, WEEK_PERIOD};

use chrono::{Datelike, NaiveDate, TimeZone, Utc};

/// Seconds between the Unix epoch (a Thursday) and the first Monday after
/// it, used to shift weekly alignment onto Monday 00:00 UTC.
const EPOCH_TO_MONDAY: UnixTimestamp = 4 * DAY_PERIOD;

/// Returns the next aligned boundary strictly after `now`.
///
/// `None` for [`Cadence::Custom`], whose cycles end at the contract-supplied
/// end time instead of a wall-clock mark.
pub fn next_boundary(cadence: Cadence, now: UnixTimestamp) -> Option<UnixTimestamp> {
    match cadence {
        Cadence::FiveMin => Some(next_aligned(now, FIVE_MIN_PERIOD, 0)),
        Cadence::Hourly => Some(next_aligned(now, HOUR_PERIOD, 0)),
        Cadence::Daily => Some(next_aligned(now, DAY_PERIOD, 0)),
        Cadence::Weekly => Some(next_aligned(now, WEEK_PERIOD, EPOCH_TO_MONDAY)),
        Cadence::Monthly => next_month_start(now),
        Cadence::Custom => None,
    }
}

/// Returns the start of the cycle ending at `boundary`.
///
/// Fixed subtraction for the fixed-length cadences; the month cadence
/// decrements the UTC month field, so variable month lengths stay exact.
/// `None` for [`Cadence::Custom`].
pub fn cycle_start(cadence: Cadence, boundary: UnixTimestamp) -> Option<UnixTimestamp> {
    match cadence {
        Cadence::FiveMin => Some(boundary - FIVE_MIN_PERIOD),
        Cadence::Hourly => Some(boundary - HOUR_PERIOD),
        Cadence::Daily => Some(boundary - DAY_PERIOD),
        Cadence::Weekly => Some(boundary - WEEK_PERIOD),
        Cadence::Monthly => previous_month_start(boundary),
        Cadence::Custom => None,
    }
}

/// Next multiple of `period` (shifted by `offset`) strictly after `now`.
fn next_aligned(now: UnixTimestamp, period: UnixTimestamp, offset: UnixTimestamp) -> UnixTimestamp {
    ((now - offset).div_euclid(period) + 1) * period + offset
}

fn next_month_start(now: UnixTimestamp) -> Option<UnixTimestamp> {
    let date = Utc.timestamp_opt(now, 0).single()?.date_naive();
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    month_start_timestamp(year, month)
}

fn previous_month_start(boundary: UnixTimestamp) -> Option<UnixTimestamp> {
    let date = Utc.timestamp_opt(boundary, 0).single()?.date_naive();
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    month_start_timestamp(year, month)
}

fn month_start_timestamp(year: i32, month: u32) -> Option<UnixTimestamp> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
    Some(start.and_utc().timestamp())
}
