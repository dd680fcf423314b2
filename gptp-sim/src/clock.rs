//! A simulated hardware clock with a drifting oscillator

use std::{cell::RefCell, rc::Rc};

use gptp::{
    time::{RtcTime, NANOS_PER_SECOND},
    Clock,
};

/// Register state of a simulated clock
///
/// The counter advances at `(1 + drift) * increment / nominal` local
/// nanoseconds per true nanosecond. Whenever the increment changes the
/// counter is rebased, so past time keeps the rate it was counted at.
#[derive(Debug)]
pub struct ClockState {
    nominal_increment: u32,
    drift: f64,
    increment: u32,
    phase_offset: u32,
    sub_cycle_offset: u32,
    /// Current true time
    now: u64,
    base_true: u64,
    base_local: f64,
}

impl ClockState {
    pub fn new(nominal_increment: u32, drift_ppm: f64, initial_time: u64) -> Self {
        Self {
            nominal_increment,
            drift: drift_ppm * 1e-6,
            increment: nominal_increment,
            phase_offset: 0,
            sub_cycle_offset: 0,
            now: 0,
            base_true: 0,
            base_local: initial_time as f64,
        }
    }

    fn rate(&self) -> f64 {
        (1.0 + self.drift) * self.increment as f64 / self.nominal_increment as f64
    }

    /// Advance true time. Time never runs backwards.
    pub fn set_now(&mut self, now: u64) {
        self.now = self.now.max(now);
    }

    /// Syntonized time in nanoseconds
    pub fn syntonized(&self) -> u64 {
        let elapsed = (self.now - self.base_true) as f64;
        (self.base_local + elapsed * self.rate()) as u64
    }

    /// Synchronized time in nanoseconds
    pub fn synchronized(&self) -> u64 {
        self.syntonized() + self.phase_offset as u64
    }

    /// Hardware timestamp of an event happening now
    pub fn timestamp(&self) -> u32 {
        (self.syntonized() % NANOS_PER_SECOND as u64) as u32
    }

    /// Current frequency error relative to true time, in parts per million
    pub fn frequency_error_ppm(&self) -> f64 {
        (self.rate() - 1.0) * 1e6
    }

    pub fn sub_cycle_offset(&self) -> u32 {
        self.sub_cycle_offset
    }

    fn set_increment(&mut self, increment: u32) {
        let elapsed = (self.now - self.base_true) as f64;
        self.base_local += elapsed * self.rate();
        self.base_true = self.now;
        self.increment = increment;
    }
}

/// The [`Clock`] handed to a port, sharing its state with the simulation
#[derive(Debug, Clone)]
pub struct SimClock(pub Rc<RefCell<ClockState>>);

impl Clock for SimClock {
    fn read_clock(&self) -> RtcTime {
        let time = self.0.borrow().synchronized();
        RtcTime::new(
            time / NANOS_PER_SECOND as u64,
            (time % NANOS_PER_SECOND as u64) as u32,
        )
    }

    fn write_phase_offset(&mut self, nanos: u32) {
        self.0.borrow_mut().phase_offset = nanos;
    }

    fn write_frequency_increment(&mut self, increment: u32) {
        self.0.borrow_mut().set_increment(increment);
    }

    fn read_frequency_increment(&self) -> u32 {
        self.0.borrow().increment
    }

    fn write_sub_cycle_phase_offset(&mut self, nanos: u32) {
        self.0.borrow_mut().sub_cycle_offset = nanos;
    }
}
