//! Time representations used by the engine
//!
//! The hardware clock keeps nanoseconds and seconds in separate registers and
//! every timestamp the engine works with is the nanoseconds part only. All
//! arithmetic on those is therefore modulo one second, see [`SubSecond`].

mod interval;
mod subsecond;

pub use interval::{Interval, InvalidInterval};
pub use subsecond::{RtcTime, SubSecond, NANOS_PER_SECOND};

/// Number of engine ticks per second.
pub const TICKS_PER_SECOND: u16 = 128;
