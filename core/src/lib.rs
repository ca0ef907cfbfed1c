//! Timing core of the [Lucky Ponds](https://luckyponds.xyz) platform.
//!
//! Ponds are time-boxed deposit pools. This crate decides, from a pond's
//! on-chain snapshot and a caller-supplied timestamp, where the pond is in
//! its lifecycle and whether depositing is currently safe. It performs no
//! I/O and never reads the system clock.
mod error;

/// Wall-clock cycle boundary computations for fixed-cadence ponds.
pub mod clock;
/// Data structures describing a pond's on-chain snapshot and derived status.
pub mod state;
/// Status resolution and interaction gating for a single pond snapshot.
pub mod status;

pub use error::PondCoreError;

/// An approximate measure of real-world time, expressed in seconds since
/// the Unix epoch.
pub type UnixTimestamp = i64;

/// Seconds a five-minute pond stays locked after a wall-clock boundary
/// while winner selection is pending.
pub const FIVE_MIN_SELECTION_TIMELOCK: UnixTimestamp = 20;
/// Seconds every other pond stays locked after its end time while winner
/// selection is pending.
pub const DEFAULT_SELECTION_TIMELOCK: UnixTimestamp = 60;
/// Deposits are gated during the last seconds before a cycle boundary.
pub const PRE_BOUNDARY_GUARD: UnixTimestamp = 10;
/// Deposits are gated during the first seconds of a cycle and during the
/// first seconds after a boundary is crossed.
pub const POST_BOUNDARY_GUARD: UnixTimestamp = 25;

/// Seconds in a five-minute cycle.
pub const FIVE_MIN_PERIOD: UnixTimestamp = 300;
/// Seconds in an hourly cycle.
pub const HOUR_PERIOD: UnixTimestamp = 3600;
/// Seconds in a daily cycle.
pub const DAY_PERIOD: UnixTimestamp = 86_400;
/// Seconds in a weekly cycle.
pub const WEEK_PERIOD: UnixTimestamp = 604_800;
