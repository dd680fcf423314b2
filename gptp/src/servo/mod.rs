//! Clock servo driven by Sync/FollowUp pairs
//!
//! Every pair yields one measurement of the master's time at the moment the
//! Sync arrived. The phase is corrected on every measurement, the frequency
//! once every configured number of pairs.

mod frequency;

pub use frequency::{adjusted_increment, increment_adjustment};

use crate::{
    clock::Clock,
    config::ServoConfig,
    time::{SubSecond, NANOS_PER_SECOND},
};

/// One Sync/FollowUp pair as seen by a slave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncMeasurement {
    /// Seconds of the master's origin timestamp from the FollowUp
    pub origin_seconds: u64,
    /// Nanoseconds of the master's origin timestamp from the FollowUp
    pub origin: SubSecond,
    /// Correction field of the FollowUp in whole nanoseconds
    pub correction: i64,
    /// Current mean link delay to the master
    pub link_delay: u32,
    /// Syntonized receive time of the Sync
    pub receipt: SubSecond,
    pub sequence_id: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RatePoint {
    /// Master time in nanoseconds, wrapping with the 64 bit counter
    master_time: u64,
    master: SubSecond,
    slave: SubSecond,
    sequence_id: u16,
}

#[derive(Debug)]
pub struct Servo {
    config: ServoConfig,
    phase_offset: u32,
    pairs_since_update: u16,
    baseline: Option<RatePoint>,
    locked: bool,
}

impl Servo {
    pub fn new(config: ServoConfig) -> Self {
        Self {
            config,
            phase_offset: 0,
            pairs_since_update: 0,
            baseline: None,
            locked: false,
        }
    }

    /// The phase offset most recently written to the clock
    pub fn phase_offset(&self) -> u32 {
        self.phase_offset
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Forget the frequency baseline and lock, for when the master changes
    pub fn reset(&mut self) {
        self.baseline = None;
        self.pairs_since_update = 0;
        self.locked = false;
    }

    /// Process one Sync/FollowUp pair.
    ///
    /// Returns the new lock state when it changed.
    pub fn measurement(
        &mut self,
        measurement: SyncMeasurement,
        clock: &mut impl Clock,
    ) -> Option<bool> {
        let master = self.correct_phase(measurement, clock);
        let master_time = measurement
            .origin_seconds
            .wrapping_mul(NANOS_PER_SECOND as u64)
            .wrapping_add_signed(
                measurement.origin.nanos() as i64
                    + measurement.correction
                    + measurement.link_delay as i64,
            );

        let current = RatePoint {
            master_time,
            master,
            slave: measurement.receipt,
            sequence_id: measurement.sequence_id,
        };
        let Some(baseline) = self.baseline else {
            self.baseline = Some(current);
            self.pairs_since_update = 0;
            return None;
        };

        self.pairs_since_update += 1;
        if self.pairs_since_update < self.config.sync_pairs_per_rate_update {
            return None;
        }
        self.pairs_since_update = 0;
        self.baseline = Some(current);

        let sequence_distance = current.sequence_id.wrapping_sub(baseline.sequence_id);
        if sequence_distance != self.config.sync_pairs_per_rate_update {
            log::debug!(
                "Skipping frequency correction, {} syncs passed instead of {}",
                sequence_distance,
                self.config.sync_pairs_per_rate_update
            );
            return None;
        }

        self.correct_frequency(baseline, current, clock)
    }

    /// Write the phase offset for this measurement, returning the master time
    /// at which the Sync was received.
    fn correct_phase(
        &mut self,
        measurement: SyncMeasurement,
        clock: &mut impl Clock,
    ) -> SubSecond {
        let corrected = measurement.origin.nanos() as i64
            + measurement.correction
            + measurement.link_delay as i64;
        let master = SubSecond::from_signed(corrected);
        let wrapped = !(0..NANOS_PER_SECOND as i64).contains(&corrected);

        let error = master.since(measurement.receipt);
        log::trace!(
            "Master at {} (wrapped: {}), received at {}, offset {}ns",
            master,
            wrapped,
            measurement.receipt,
            error
        );
        clock.write_phase_offset(error);

        let period = self.config.sub_cycle_period;
        let step = SubSecond::new(error)
            .offset_from(SubSecond::new(self.phase_offset))
            .unsigned_abs();
        if period > 0 && step > period {
            let boundary = (error.div_ceil(period) * period) % NANOS_PER_SECOND;
            log::debug!("Moving sub-cycle phase to {}ns", boundary);
            clock.write_sub_cycle_phase_offset(boundary);
        }
        self.phase_offset = error;

        master
    }

    fn correct_frequency(
        &mut self,
        baseline: RatePoint,
        current: RatePoint,
        clock: &mut impl Clock,
    ) -> Option<bool> {
        // the whole duration comes from the origin seconds, the error is the
        // difference of the two durations, which is small, within the second
        let master_duration = current.master_time.wrapping_sub(baseline.master_time);
        let slave_duration = current.slave.since(baseline.slave);
        let slave_error = SubSecond::new(current.master.since(baseline.master))
            .offset_from(SubSecond::new(slave_duration));
        let magnitude = slave_error.unsigned_abs();

        let increment = clock.read_frequency_increment();
        let adjustment = increment_adjustment(magnitude, master_duration, increment);
        let new_increment = adjusted_increment(
            increment,
            adjustment,
            slave_error < 0,
            self.config.increment_rail(),
        );
        log::trace!(
            "Master took {}ns, we lagged {}ns, increment {} -> {}",
            master_duration,
            slave_error,
            increment,
            new_increment
        );
        clock.write_frequency_increment(new_increment);

        let locked = magnitude <= self.config.lock_threshold;
        if locked != self.locked {
            self.locked = locked;
            Some(locked)
        } else {
            None
        }
    }
}
