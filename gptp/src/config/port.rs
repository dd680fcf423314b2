use super::ServoConfig;
use crate::{
    datastructures::{
        common::{ClockIdentity, ClockQuality, PortIdentity},
        frame::MacAddress,
    },
    time::Interval,
};

/// Static configuration of a port.
///
/// Intervals given here are the initial ones; a peer may change the operative
/// intervals at runtime through signaling.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case", deny_unknown_fields, default)
)]
pub struct PortConfig {
    pub port_identity: PortIdentity,
    /// Source address of transmitted frames
    pub mac_address: MacAddress,
    pub clock_quality: ClockQuality,
    pub priority_1: u8,
    pub priority_2: u8,
    pub sync_interval: Interval,
    pub announce_interval: Interval,
    pub pdelay_interval: Interval,
    /// Largest mean link delay in nanoseconds for which the peer is
    /// considered capable of gPTP
    pub neighbor_prop_delay_threshold: u32,
    /// Number of consecutive peer delay exchanges that may go unanswered
    /// before the peer stops being capable of gPTP
    pub allowed_lost_responses: u8,
    /// Nanoseconds between the transmit timestamp point and the wire
    pub tx_latency: u32,
    /// Nanoseconds between the wire and the receive timestamp point
    pub rx_latency: u32,
    pub servo: ServoConfig,
}

impl PortConfig {
    /// Defaults for port 1 of the interface with address `mac_address`
    pub fn for_mac_address(mac_address: MacAddress) -> Self {
        Self {
            port_identity: PortIdentity {
                clock_identity: ClockIdentity::from_mac_address(mac_address),
                port_number: 1,
            },
            mac_address,
            ..Default::default()
        }
    }
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            port_identity: PortIdentity::default(),
            mac_address: [0; 6],
            clock_quality: ClockQuality::default(),
            priority_1: 248,
            priority_2: 248,
            sync_interval: Interval::EIGHTH_SECOND,
            announce_interval: Interval::ONE_SECOND,
            pdelay_interval: Interval::ONE_SECOND,
            neighbor_prop_delay_threshold: 800,
            allowed_lost_responses: 3,
            tx_latency: 0,
            rx_latency: 0,
            servo: ServoConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_follows_mac_address() {
        let config = PortConfig::for_mac_address([0x00, 0x0a, 0x35, 0x01, 0x02, 0x03]);
        assert_eq!(
            config.port_identity.clock_identity,
            ClockIdentity([0x00, 0x0a, 0x35, 0xff, 0xfe, 0x01, 0x02, 0x03])
        );
        assert_eq!(config.port_identity.port_number, 1);
        assert_eq!(config.sync_interval.as_ticks(), 16);
    }
}
