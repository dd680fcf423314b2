//! The protocol engine of a single gPTP port
//!
//! A [`Port`] does no I/O of its own. The integration calls
//! [`handle_tick`](Port::handle_tick) 128 times per second and
//! [`handle_frame`](Port::handle_frame) for every received frame together with
//! its receive timestamp; the port reacts by transmitting through its
//! [`MessageTransport`], adjusting its [`Clock`] and notifying its
//! [`DiscontinuitySink`]. Both handlers run to completion and must not be
//! called concurrently.

use crate::{
    bmc::GrandmasterRecord,
    clock::Clock,
    config::PortConfig,
    datastructures::{
        frame::{EthernetHeader, PTP_ETHERTYPE},
        messages::{Message, MessageBuilder, MessageType},
        WireFormatError,
    },
    network::MessageTransport,
    notify::DiscontinuitySink,
    servo::Servo,
    time::{Interval, SubSecond},
};

pub use error::{PortError, Result};
pub use intervals::{MessageInterval, SignalingIntervals};
pub use peer_delay::{mean_link_delay, PeerDelay, PeerDelayState};
pub use role::Role;

use intervals::{
    expired, receipt_threshold, transmit_threshold, Counters, ANNOUNCE_RECEIPT_TIMEOUT,
    SYNC_RECEIPT_TIMEOUT,
};
use sequence_id::SequenceIdGenerator;
use slave::PendingSync;

mod error;
mod intervals;
mod master;
mod peer_delay;
mod role;
mod sequence_id;
mod slave;
#[cfg(test)]
mod tests;

/// PTP version handled by the engine
const PTP_VERSION: u8 = 2;

pub struct Port<'s, C, T, S> {
    config: PortConfig,
    clock: C,
    transport: T,
    sink: &'s S,

    role: Role,
    local_record: GrandmasterRecord,
    grandmaster: GrandmasterRecord,

    intervals: SignalingIntervals,
    counters: Counters,
    /// Sync interval of the master, in ticks, for the receipt timeout
    sync_receipt_interval: u16,

    pending_sync: Option<PendingSync>,
    peer_delay: PeerDelay,
    servo: Servo,

    sync_ids: SequenceIdGenerator,
    announce_ids: SequenceIdGenerator,
    pdelay_ids: SequenceIdGenerator,
}

impl<'s, C, T, S> Port<'s, C, T, S> {
    pub fn config(&self) -> &PortConfig {
        &self.config
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The grandmaster this port currently follows, its own clock while
    /// master
    pub fn grandmaster(&self) -> &GrandmasterRecord {
        &self.grandmaster
    }

    /// What this port advertises when it is grandmaster
    pub fn local_record(&self) -> &GrandmasterRecord {
        &self.local_record
    }

    pub fn intervals(&self) -> SignalingIntervals {
        self.intervals
    }

    pub fn peer_delay(&self) -> &PeerDelay {
        &self.peer_delay
    }

    pub fn is_as_capable(&self) -> bool {
        self.peer_delay.is_as_capable()
    }

    /// Last accepted mean link delay in nanoseconds
    pub fn link_delay(&self) -> u32 {
        self.peer_delay.link_delay()
    }

    pub fn servo(&self) -> &Servo {
        &self.servo
    }

    pub fn is_locked(&self) -> bool {
        self.servo.is_locked()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

impl<'s, C: Clock, T: MessageTransport, S: DiscontinuitySink> Port<'s, C, T, S> {
    /// Create a port, which starts out as master of its own clock.
    ///
    /// The clock's frequency increment is reset to nominal.
    pub fn new(config: PortConfig, mut clock: C, transport: T, sink: &'s S) -> Self {
        let local_record = GrandmasterRecord::local(
            config.port_identity,
            config.clock_quality,
            config.priority_1,
            config.priority_2,
            config.announce_interval,
        );
        clock.write_frequency_increment(config.servo.nominal_increment);
        log::info!("Port {} starting as master", config.port_identity);

        Port {
            clock,
            transport,
            sink,
            role: Role::Master,
            local_record,
            grandmaster: local_record,
            intervals: SignalingIntervals::initial(&config),
            counters: Counters::default(),
            sync_receipt_interval: config.sync_interval.as_ticks(),
            pending_sync: None,
            peer_delay: PeerDelay::new(&config),
            servo: Servo::new(config.servo),
            sync_ids: SequenceIdGenerator::new(),
            announce_ids: SequenceIdGenerator::new(),
            pdelay_ids: SequenceIdGenerator::new(),
            config,
        }
    }

    /// Advance the port by one tick of 1/128 s.
    pub fn handle_tick(&mut self) {
        match self.role {
            Role::Master => {
                // nothing is mastered over a link without a capable peer
                if self.peer_delay.is_as_capable() {
                    if let Some(threshold) = transmit_threshold(self.intervals.sync) {
                        if expired(&mut self.counters.sync, threshold) {
                            self.send_sync();
                        }
                    }
                    if let Some(threshold) = transmit_threshold(self.intervals.announce) {
                        if expired(&mut self.counters.announce, threshold) {
                            self.send_announce();
                        }
                    }
                }
            }
            Role::Slave => {
                let announce_timeout = receipt_threshold(
                    self.grandmaster.announce_interval,
                    ANNOUNCE_RECEIPT_TIMEOUT,
                );
                let sync_timeout =
                    receipt_threshold(self.sync_receipt_interval, SYNC_RECEIPT_TIMEOUT);

                if expired(&mut self.counters.announce, announce_timeout) {
                    log::info!(
                        "Announce receipt timeout, log interval {:?}",
                        Interval::from_ticks(self.grandmaster.announce_interval)
                            .map(Interval::as_log_2)
                    );
                    self.become_master(false);
                } else if expired(&mut self.counters.sync, sync_timeout) {
                    log::info!(
                        "Sync receipt timeout, log interval {:?}",
                        Interval::from_ticks(self.sync_receipt_interval).map(Interval::as_log_2)
                    );
                    self.become_master(false);
                }
            }
        }

        if let Some(threshold) = transmit_threshold(self.intervals.link_delay) {
            if expired(&mut self.counters.link_delay, threshold) {
                self.send_pdelay_req();
            }
        }
    }

    /// Process a received Ethernet frame, timestamped with the syntonized
    /// nanoseconds at which it passed the receive timestamp point.
    ///
    /// Frames that cannot be acted upon are logged and dropped.
    pub fn handle_frame(&mut self, frame: &[u8], receipt: u32) {
        if let Err(error) = self.process_frame(frame, receipt) {
            match error {
                PortError::DelayOutOfRange(_) | PortError::UnsupportedInterval(_) => {
                    log::warn!("{}", error)
                }
                PortError::Network => log::error!("Could not respond to message: {}", error),
                _ => log::debug!("Dropped frame: {}", error),
            }
        }
    }

    pub(crate) fn process_frame(&mut self, frame: &[u8], receipt: u32) -> Result<()> {
        let (ethernet, payload) = EthernetHeader::split(frame)?;
        if ethernet.ethertype != PTP_ETHERTYPE {
            return Err(PortError::NotPtp(ethernet.ethertype));
        }
        // checked ahead of decoding, other versions lay out their messages
        // differently
        let version = payload.get(1).ok_or(WireFormatError::BufferTooShort)? & 0x0f;
        if version != PTP_VERSION {
            return Err(PortError::UnsupportedVersion(version));
        }

        let message = Message::deserialize(payload)?;
        log::trace!(
            "Received {:?} {} from {}",
            message.content_type(),
            message.header().sequence_id(),
            message.header().source_port_identity()
        );

        match message {
            Message::Sync(message) => self.handle_sync(&message, receipt),
            Message::FollowUp(message) => self.handle_follow_up(&message),
            Message::PDelayReq(message) => self.handle_pdelay_req(&message, receipt),
            Message::PDelayResp(message) => {
                let (t4, _) = SubSecond::new(receipt).wrapping_sub(self.config.rx_latency);
                self.peer_delay
                    .response(&message, t4, self.config.port_identity)
            }
            Message::PDelayRespFollowUp(message) => self
                .peer_delay
                .response_follow_up(&message, self.config.port_identity)
                .map(|_| ()),
            Message::Announce(message) => self.handle_announce(&message),
            Message::Signaling(message) => self.handle_signaling(&message),
        }
    }

    fn send_pdelay_req(&mut self) {
        self.peer_delay.finish_exchange();

        let sequence_id = self.pdelay_ids.generate();
        let request = self
            .message_builder()
            .sequence_id(sequence_id)
            .log_message_interval(self.intervals.link_delay.log_2())
            .pdelay_req_message();

        match self.send_event(&request) {
            Ok(transmitted) => {
                let (t1, _) = SubSecond::new(transmitted).wrapping_add(self.config.tx_latency);
                self.peer_delay.request_sent(sequence_id, t1);
            }
            Err(error) => log::error!("Could not send peer delay request: {}", error),
        }
    }

    fn message_builder(&self) -> MessageBuilder {
        Message::builder().source_port_identity(self.config.port_identity)
    }

    fn send(&mut self, message: &Message) -> Result<()> {
        let frame = message.to_frame(self.config.mac_address)?;
        self.transport
            .send(message.content_type(), &frame)
            .map_err(|error| {
                log::error!("Failed to send {:?}: {:?}", message.content_type(), error);
                PortError::Network
            })
    }

    /// Send an event message, returning its syntonized transmit timestamp.
    fn send_event(&mut self, message: &Message) -> Result<u32> {
        self.send(message)?;
        self.transport
            .capture_transmit_timestamp(message.content_type())
            .map_err(|error| {
                log::error!(
                    "Missing transmit timestamp of {:?}: {:?}",
                    message.content_type(),
                    error
                );
                PortError::Network
            })
    }

    /// Synchronized time of a syntonized transmit timestamp
    fn synchronized_transmit_time(&self, transmitted: u32) -> SubSecond {
        let (syntonized, _) = SubSecond::new(transmitted).wrapping_add(self.config.tx_latency);
        syntonized.wrapping_add(self.servo.phase_offset()).0
    }

    /// Synchronized time of a syntonized receive timestamp
    fn synchronized_receive_time(&self, receipt: u32) -> SubSecond {
        let (syntonized, _) = SubSecond::new(receipt).wrapping_sub(self.config.rx_latency);
        syntonized.wrapping_add(self.servo.phase_offset()).0
    }
}
