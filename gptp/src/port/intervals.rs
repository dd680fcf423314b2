//! Message intervals and the tick counters that drive them

use super::error::{PortError, Result};
use crate::{
    config::PortConfig, datastructures::messages::MessageIntervalRequest, time::Interval,
};

/// Log interval requesting the initial interval be restored
const RESTORE_INITIAL: i8 = 126;
/// Log interval requesting transmission stop
const STOP_SENDING: i8 = 127;
/// Log interval requesting no change
const NO_CHANGE: i8 = -128;

/// Announce receipt timeout, in announce intervals
pub(crate) const ANNOUNCE_RECEIPT_TIMEOUT: u32 = 2;
/// Sync receipt timeout, in sync intervals
pub(crate) const SYNC_RECEIPT_TIMEOUT: u32 = 3;

/// Operative interval of a periodic transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageInterval {
    Enabled(Interval),
    Disabled,
}

impl MessageInterval {
    /// Interval in ticks, when enabled
    pub fn ticks(self) -> Option<u16> {
        match self {
            MessageInterval::Enabled(interval) => Some(interval.as_ticks()),
            MessageInterval::Disabled => None,
        }
    }

    /// Value for the log message interval field of transmitted messages
    pub fn log_2(self) -> i8 {
        match self {
            MessageInterval::Enabled(interval) => interval.as_log_2(),
            MessageInterval::Disabled => STOP_SENDING,
        }
    }

    /// Apply one field of a message interval request.
    fn request(&mut self, log_2: i8, initial: Interval) -> Result<()> {
        *self = match log_2 {
            NO_CHANGE => return Ok(()),
            RESTORE_INITIAL => MessageInterval::Enabled(initial),
            STOP_SENDING => MessageInterval::Disabled,
            _ => MessageInterval::Enabled(
                Interval::from_log_2(log_2).ok_or(PortError::UnsupportedInterval(log_2))?,
            ),
        };
        Ok(())
    }
}

/// Operative transmit intervals of a port, as changed by signaling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalingIntervals {
    pub sync: MessageInterval,
    pub link_delay: MessageInterval,
    pub announce: MessageInterval,
}

impl SignalingIntervals {
    pub fn initial(config: &PortConfig) -> Self {
        Self {
            sync: MessageInterval::Enabled(config.sync_interval),
            link_delay: MessageInterval::Enabled(config.pdelay_interval),
            announce: MessageInterval::Enabled(config.announce_interval),
        }
    }

    /// Apply a peer's message interval request.
    ///
    /// Fields are handled independently; an unsupported value leaves its own
    /// interval alone and is reported after the other fields are applied.
    pub(crate) fn apply_request(
        &mut self,
        request: &MessageIntervalRequest,
        config: &PortConfig,
    ) -> Result<()> {
        let link_delay = self
            .link_delay
            .request(request.link_delay_interval, config.pdelay_interval);
        let sync = self
            .sync
            .request(request.time_sync_interval, config.sync_interval);
        let announce = self
            .announce
            .request(request.announce_interval, config.announce_interval);

        log::debug!(
            "Intervals after signaling: sync {:?}, link delay {:?}, announce {:?}",
            self.sync,
            self.link_delay,
            self.announce
        );
        link_delay.and(sync).and(announce)
    }
}

/// Tick counters of a port.
///
/// The sync and announce counters time transmission while master and receipt
/// timeouts while slave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Counters {
    pub sync: u32,
    pub announce: u32,
    pub link_delay: u32,
}

/// Advance `counter` by one tick, firing once it has reached `threshold`.
pub(crate) fn expired(counter: &mut u32, threshold: u32) -> bool {
    if *counter >= threshold {
        *counter = 0;
        true
    } else {
        *counter += 1;
        false
    }
}

/// Ticks after which a periodic transmission of `interval` fires
pub(crate) fn transmit_threshold(interval: MessageInterval) -> Option<u32> {
    interval.ticks().map(|ticks| ticks as u32 - 1)
}

/// Ticks without receipt after which a timeout of `multiple` intervals fires
pub(crate) fn receipt_threshold(interval_ticks: u16, multiple: u32) -> u32 {
    (interval_ticks as u32).saturating_sub(1) * multiple
}
