/// Tuning of the clock servo
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case", deny_unknown_fields, default)
)]
pub struct ServoConfig {
    /// Largest frequency error, in nanoseconds per rate measurement, for
    /// which the clock counts as locked
    pub lock_threshold: u32,
    /// Number of Sync/FollowUp pairs between two frequency corrections
    pub sync_pairs_per_rate_update: u16,
    /// Maximum deviation of the frequency increment from nominal, in parts
    /// per million
    pub max_ppm: u32,
    /// Frequency increment at which the clock runs at its nominal rate
    pub nominal_increment: u32,
    /// Period of the clock's sub-cycle output in nanoseconds
    pub sub_cycle_period: u32,
}

impl ServoConfig {
    /// Lowest and highest increment the servo may program
    pub fn increment_rail(&self) -> (u32, u32) {
        let deviation =
            (self.nominal_increment as u64 * self.max_ppm as u64 / 1_000_000) as u32;
        (
            self.nominal_increment.saturating_sub(deviation),
            self.nominal_increment.saturating_add(deviation),
        )
    }
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            lock_threshold: 1000,
            sync_pairs_per_rate_update: 2,
            max_ppm: 100,
            // 8ns per cycle of a 125MHz clock, 20 fractional bits
            nominal_increment: 8 << 20,
            // 8kHz
            sub_cycle_period: 125_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rail_is_symmetric_around_nominal() {
        let config = ServoConfig {
            nominal_increment: 1_000_000,
            max_ppm: 100,
            ..Default::default()
        };
        assert_eq!(config.increment_rail(), (999_900, 1_000_100));
    }
}
