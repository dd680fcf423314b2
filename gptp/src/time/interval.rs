use super::TICKS_PER_SECOND;

/// A message interval, stored as its base-2 logarithm in seconds.
///
/// Only exponents in `-7..=8` are representable: the engine ticks every
/// 1/128 s, so anything faster cannot be scheduled and anything slower no
/// longer fits the 16 bit tick counters.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "i8", into = "i8")
)]
pub struct Interval(i8);

impl core::fmt::Debug for Interval {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Interval")
            .field("ticks", &self.as_ticks())
            .field("log_base_2", &self.0)
            .finish()
    }
}

impl Interval {
    pub const MIN_LOG_2: i8 = -7;
    pub const MAX_LOG_2: i8 = 8;

    pub const ONE_SECOND: Self = Self(0);
    pub const EIGHTH_SECOND: Self = Self(-3);

    pub const fn from_log_2(log_2: i8) -> Option<Self> {
        if log_2 >= Self::MIN_LOG_2 && log_2 <= Self::MAX_LOG_2 {
            Some(Self(log_2))
        } else {
            None
        }
    }

    pub const fn as_log_2(self) -> i8 {
        self.0
    }

    /// Length of the interval in engine ticks of 1/128 s
    pub const fn as_ticks(self) -> u16 {
        if self.0 < 0 {
            TICKS_PER_SECOND >> self.0.unsigned_abs()
        } else {
            TICKS_PER_SECOND << self.0
        }
    }

    /// The interval closest to, but not longer than, `ticks`.
    ///
    /// Returns `None` for zero ticks.
    pub const fn from_ticks(ticks: u16) -> Option<Self> {
        if ticks == 0 {
            return None;
        }
        let shifts = ticks.leading_zeros() as i8;
        Some(Self(Self::MAX_LOG_2 - shifts))
    }
}

/// A log interval outside the schedulable range
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("log interval {0} not in -7..=8")]
pub struct InvalidInterval(pub i8);

impl TryFrom<i8> for Interval {
    type Error = InvalidInterval;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Self::from_log_2(value).ok_or(InvalidInterval(value))
    }
}

impl From<Interval> for i8 {
    fn from(value: Interval) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_to_ticks() {
        let cases = [(-7, 1), (-3, 16), (-1, 64), (0, 128), (1, 256), (8, 32768)];

        for (log_2, ticks) in cases {
            let interval = Interval::from_log_2(log_2).unwrap();
            assert_eq!(interval.as_ticks(), ticks);
            assert_eq!(Interval::from_ticks(ticks), Some(interval));
        }
    }

    #[test]
    fn out_of_range_exponents_are_rejected() {
        assert_eq!(Interval::from_log_2(-8), None);
        assert_eq!(Interval::from_log_2(9), None);
        assert_eq!(Interval::from_log_2(126), None);
        assert_eq!(Interval::try_from(-128i8), Err(InvalidInterval(-128)));
    }

    #[test]
    fn ticks_round_down_to_power_of_two() {
        assert_eq!(Interval::from_ticks(200), Interval::from_log_2(0));
        assert_eq!(Interval::from_ticks(0), None);
    }
}
