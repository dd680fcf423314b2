pub const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Nanoseconds within the current second.
///
/// Only the position within the second is kept, so a difference between two
/// `SubSecond`s is known modulo one second. [`since`](SubSecond::since) reads
/// it as an elapsed time below one second, [`offset_from`](SubSecond::offset_from)
/// as the nearest signed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct SubSecond(u32);

impl SubSecond {
    pub const ZERO: Self = Self(0);

    /// Reduce `nanos` into the current second
    pub const fn new(nanos: u32) -> Self {
        Self(nanos % NANOS_PER_SECOND)
    }

    /// Reduce a signed nanosecond count into the current second
    pub const fn from_signed(nanos: i64) -> Self {
        Self(nanos.rem_euclid(NANOS_PER_SECOND as i64) as u32)
    }

    pub const fn nanos(self) -> u32 {
        self.0
    }

    /// Time elapsed from `earlier` to `self`, wrapping at the second boundary.
    pub const fn since(self, earlier: SubSecond) -> u32 {
        if self.0 >= earlier.0 {
            self.0 - earlier.0
        } else {
            self.0 + (NANOS_PER_SECOND - earlier.0)
        }
    }

    /// Signed distance from `other` to `self`, taking the shorter way around
    /// the second. The result lies in `-499_999_999..=500_000_000`.
    pub const fn offset_from(self, other: SubSecond) -> i32 {
        let forward = self.since(other);
        if forward > NANOS_PER_SECOND / 2 {
            forward as i32 - NANOS_PER_SECOND as i32
        } else {
            forward as i32
        }
    }

    /// Add `nanos`, returning whether the result crossed into the next second.
    pub const fn wrapping_add(self, nanos: u32) -> (SubSecond, bool) {
        let nanos = nanos % NANOS_PER_SECOND;
        let sum = self.0 + nanos;
        if sum >= NANOS_PER_SECOND {
            (Self(sum - NANOS_PER_SECOND), true)
        } else {
            (Self(sum), false)
        }
    }

    /// Subtract `nanos`, returning whether the result went back a second.
    pub const fn wrapping_sub(self, nanos: u32) -> (SubSecond, bool) {
        let nanos = nanos % NANOS_PER_SECOND;
        if self.0 >= nanos {
            (Self(self.0 - nanos), false)
        } else {
            (Self(self.0 + (NANOS_PER_SECOND - nanos)), true)
        }
    }
}

impl core::fmt::Display for SubSecond {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}ns", self.0)
    }
}

/// A reading of the hardware real time clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RtcTime {
    pub seconds: u64,
    pub nanos: SubSecond,
}

impl RtcTime {
    pub const fn new(seconds: u64, nanos: u32) -> Self {
        Self {
            seconds,
            nanos: SubSecond::new(nanos),
        }
    }

    /// The clock reading with its nanoseconds replaced by `nanos`, an event
    /// that happened shortly before the reading.
    ///
    /// When the event's nanoseconds lie after the reading's, the second rolled
    /// over in between and the event belongs to the previous second.
    pub fn rewind_to(self, nanos: SubSecond) -> Self {
        let seconds = if nanos > self.nanos {
            self.seconds.saturating_sub(1)
        } else {
            self.seconds
        };
        Self { seconds, nanos }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_without_wrap() {
        assert_eq!(SubSecond::new(220).since(SubSecond::new(100)), 120);
        assert_eq!(SubSecond::new(100).since(SubSecond::new(100)), 0);
    }

    #[test]
    fn since_across_second_boundary() {
        let earlier = SubSecond::new(999_999_950);
        let later = SubSecond::new(40);
        assert_eq!(later.since(earlier), 90);
    }

    #[test]
    fn offset_takes_shorter_way() {
        let before = SubSecond::new(999_999_990);
        let after = SubSecond::new(10);
        assert_eq!(after.offset_from(before), 20);
        assert_eq!(before.offset_from(after), -20);
        assert_eq!(SubSecond::new(300).offset_from(SubSecond::new(100)), 200);
        assert_eq!(SubSecond::new(500_000_000).offset_from(SubSecond::ZERO), 500_000_000);
        assert_eq!(SubSecond::new(500_000_001).offset_from(SubSecond::ZERO), -499_999_999);
    }

    #[test]
    fn wrapping_add_flags_overflow() {
        assert_eq!(
            SubSecond::new(999_999_000).wrapping_add(2_000),
            (SubSecond::new(1_000), true)
        );
        assert_eq!(
            SubSecond::new(1_000).wrapping_add(2_000),
            (SubSecond::new(3_000), false)
        );
    }

    #[test]
    fn wrapping_sub_flags_underflow() {
        assert_eq!(
            SubSecond::new(100).wrapping_sub(200),
            (SubSecond::new(999_999_900), true)
        );
        assert_eq!(
            SubSecond::new(300).wrapping_sub(200),
            (SubSecond::new(100), false)
        );
    }

    #[test]
    fn signed_values_reduce_into_second() {
        assert_eq!(SubSecond::from_signed(-1), SubSecond::new(999_999_999));
        assert_eq!(SubSecond::from_signed(2_000_000_005), SubSecond::new(5));
    }

    #[test]
    fn rewind_crosses_second() {
        let reading = RtcTime::new(10, 50);
        assert_eq!(
            reading.rewind_to(SubSecond::new(999_999_990)),
            RtcTime::new(9, 999_999_990)
        );
        assert_eq!(reading.rewind_to(SubSecond::new(20)), RtcTime::new(10, 20));
    }
}
