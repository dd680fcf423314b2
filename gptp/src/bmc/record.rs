use crate::{
    datastructures::{
        common::{ClockIdentity, ClockQuality, PortIdentity},
        messages::AnnounceMessage,
    },
    time::Interval,
};

/// The grandmaster a port currently believes in, as compared by BMCA
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrandmasterRecord {
    pub source_port_identity: PortIdentity,
    pub grandmaster_identity: ClockIdentity,
    pub steps_removed: u16,
    pub clock_quality: ClockQuality,
    pub priority_1: u8,
    pub priority_2: u8,
    /// Whether the record describes this port's own clock
    pub is_local_master: bool,
    /// Announce interval of the grandmaster, in ticks of 1/128 s
    pub announce_interval: u16,
}

impl GrandmasterRecord {
    /// The record a port announces while it is its own grandmaster
    pub fn local(
        port_identity: PortIdentity,
        clock_quality: ClockQuality,
        priority_1: u8,
        priority_2: u8,
        announce_interval: Interval,
    ) -> Self {
        Self {
            source_port_identity: port_identity,
            grandmaster_identity: port_identity.clock_identity,
            steps_removed: 0,
            clock_quality,
            priority_1,
            priority_2,
            is_local_master: true,
            announce_interval: announce_interval.as_ticks(),
        }
    }

    /// The record advertised by a received announce message.
    ///
    /// Announces carrying a log interval we cannot schedule are taken to use
    /// `fallback_interval`.
    pub fn from_announce(message: &AnnounceMessage, fallback_interval: Interval) -> Self {
        let header = message.header();
        let announce_interval = Interval::from_log_2(header.log_message_interval())
            .unwrap_or(fallback_interval);

        Self {
            source_port_identity: header.source_port_identity(),
            grandmaster_identity: message.grandmaster_identity(),
            steps_removed: message.steps_removed(),
            clock_quality: message.grandmaster_clock_quality(),
            priority_1: message.grandmaster_priority_1(),
            priority_2: message.grandmaster_priority_2(),
            is_local_master: false,
            announce_interval: announce_interval.as_ticks(),
        }
    }
}
