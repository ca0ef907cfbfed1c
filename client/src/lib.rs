//! Pond watcher and polling coordinator of the Lucky Ponds platform.
//!
//! The [`PondWatcher`] is a synchronous per-pond state machine re-evaluated
//! on every tick; [`start_pond_watcher`] wraps it in a polling task whose
//! cadence tightens around cycle boundaries. Signals for the UI layer flow
//! through a watch channel, refresh events through a fire-and-forget
//! unbounded channel.
mod clock;
mod interval;
mod poll;
mod reader;
mod watcher;

pub use clock::{Clock, MockClock, SystemClock};
pub use interval::poll_interval;
pub use poll::{start_pond_watcher, PollHandle};
pub use reader::{PondActions, PondReader};
pub use watcher::{PondWatcher, WatcherEvent, WatcherSignals};
