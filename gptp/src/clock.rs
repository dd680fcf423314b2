//! Definitions of the abstract hardware clock

use crate::time::RtcTime;

/// Register interface of the hardware real time clock
///
/// The clock consists of a free running counter that advances by the
/// frequency increment every cycle (the syntonized time), plus a phase offset
/// register that is added to it to give the synchronized time. Hardware
/// transmit and receive timestamps are taken from the syntonized time;
/// [`read_clock`](Clock::read_clock) returns the synchronized time.
///
/// Register access cannot fail, and implementations must not block.
pub trait Clock {
    /// Current synchronized time
    fn read_clock(&self) -> RtcTime;

    /// Program the nanoseconds added to the syntonized time
    fn write_phase_offset(&mut self, nanos: u32);

    /// Program the amount the counter advances every clock cycle
    fn write_frequency_increment(&mut self, increment: u32);

    fn read_frequency_increment(&self) -> u32;

    /// Program the phase of the clock's periodic sub-cycle output
    fn write_sub_cycle_phase_offset(&mut self, nanos: u32);
}
