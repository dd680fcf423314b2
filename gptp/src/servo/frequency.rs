//! Fixed point scaling of frequency corrections
//!
//! The clock's frequency is set through an integer increment, so a measured
//! drift of `error` nanoseconds over `duration` nanoseconds has to become an
//! increment change of `increment * error / duration` without losing the
//! small ratio to integer division. The error is first scaled up so its top
//! bit is set, divided, multiplied and scaled back down again.

/// Increment change that cancels a drift of `slave_error` nanoseconds
/// accumulated over `master_duration` nanoseconds of master time, for a clock
/// currently running at `increment`.
pub fn increment_adjustment(slave_error: u32, master_duration: u64, increment: u32) -> u32 {
    if slave_error == 0 || master_duration == 0 {
        return 0;
    }

    let shift = (slave_error as u64).leading_zeros();
    let normalized = (slave_error as u64) << shift;
    let ratio = normalized / master_duration;
    let scaled = (ratio as u128 * increment as u128) >> shift;

    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Apply an adjustment to the current increment, slowing the clock down when
/// it runs fast and speeding it up otherwise, and keep the result within
/// `rail`.
pub fn adjusted_increment(
    increment: u32,
    adjustment: u32,
    runs_fast: bool,
    rail: (u32, u32),
) -> u32 {
    let (low, high) = rail;
    let increment = if runs_fast {
        increment.saturating_sub(adjustment)
    } else {
        increment.saturating_add(adjustment)
    };
    increment.clamp(low, high)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOMINAL: u32 = 8 << 20;

    #[test]
    fn microsecond_over_quarter_second() {
        // 4ppm of 8ns is 33.55 increment units
        assert_eq!(increment_adjustment(1000, 250_000_000, NOMINAL), 33);
    }

    #[test]
    fn equal_error_and_duration_is_whole_increment() {
        assert_eq!(increment_adjustment(1000, 1000, NOMINAL), NOMINAL);
        assert_eq!(increment_adjustment(1, 1, 12345), 12345);
    }

    #[test]
    fn precision_survives_small_errors() {
        // exact when the duration is a power of two
        assert_eq!(increment_adjustment(3, 1 << 30, 1 << 31), 6);
        // otherwise at most one unit short
        let adjustment = increment_adjustment(50_000, 1_000_000_000, 1_000_000);
        assert!((49..=50).contains(&adjustment), "{adjustment}");
    }

    #[test]
    fn durations_beyond_a_second() {
        // 2005ns over two seconds is about one unit of a 1_000_000 increment
        assert_eq!(increment_adjustment(2005, 2_000_000_005, 1_000_000), 1);
        assert_eq!(increment_adjustment(1000, 8_000_000_000, NOMINAL), 1);
    }

    #[test]
    fn zero_inputs_do_not_adjust() {
        assert_eq!(increment_adjustment(0, 1_000_000, NOMINAL), 0);
        assert_eq!(increment_adjustment(1_000, 0, NOMINAL), 0);
    }

    #[test]
    fn huge_ratios_saturate() {
        assert_eq!(increment_adjustment(999_999_999, 1, u32::MAX), u32::MAX);
    }

    #[test]
    fn direction_opposes_drift() {
        let rail = (0, u32::MAX);
        assert_eq!(adjusted_increment(1000, 10, true, rail), 990);
        assert_eq!(adjusted_increment(1000, 10, false, rail), 1010);
    }

    #[test]
    fn clamped_exactly_at_rail() {
        let rail = (999_900, 1_000_100);
        assert_eq!(adjusted_increment(1_000_000, 5_000, false, rail), 1_000_100);
        assert_eq!(adjusted_increment(1_000_000, 5_000, true, rail), 999_900);
        assert_eq!(adjusted_increment(1_000_000, 100, false, rail), 1_000_100);
        assert_eq!(adjusted_increment(1_000_000, 99, true, rail), 999_901);
    }
}
