//! Transmissions of a master, and the responder side of peer delay

use super::{
    error::{PortError, Result},
    Port,
};
use crate::{
    clock::Clock,
    datastructures::{
        common::{TimeInterval, WireTimestamp},
        messages::{PDelayReqMessage, TIME_SOURCE_INTERNAL_OSCILLATOR},
    },
    network::MessageTransport,
    notify::DiscontinuitySink,
};

/// Log message interval of peer delay responses, which are not periodic
const RESPONSE_LOG_INTERVAL: i8 = 0x7f;

impl<'s, C: Clock, T: MessageTransport, S: DiscontinuitySink> Port<'s, C, T, S> {
    pub(super) fn send_sync(&mut self) {
        if let Err(error) = self.try_send_sync() {
            log::error!("Could not send sync: {}", error);
        }
    }

    /// Two step sync: the Sync carries the clock as read before sending, the
    /// FollowUp the same value plus a correction up to the transmit time.
    fn try_send_sync(&mut self) -> Result<()> {
        let sequence_id = self.sync_ids.generate();
        let log_interval = self.intervals.sync.log_2();
        let coarse = self.clock.read_clock();

        let sync = self
            .message_builder()
            .sequence_id(sequence_id)
            .two_step_flag(true)
            .log_message_interval(log_interval)
            .sync_message(coarse.into());
        let transmitted = self.send_event(&sync)?;

        let precise = self.synchronized_transmit_time(transmitted);
        let correction = precise.since(coarse.nanos);
        log::trace!("Sync {} sent, correction {}ns", sequence_id, correction);

        let follow_up = self
            .message_builder()
            .sequence_id(sequence_id)
            .correction_field(TimeInterval::from_nanos(correction as i64))
            .log_message_interval(log_interval)
            .follow_up_message(coarse.into());
        self.send(&follow_up)
    }

    pub(super) fn send_announce(&mut self) {
        let grandmaster = self.grandmaster;
        let announce = self
            .message_builder()
            .sequence_id(self.announce_ids.generate())
            .ptp_timescale(true)
            .log_message_interval(self.intervals.announce.log_2())
            .announce_message(
                WireTimestamp::default(),
                0,
                grandmaster.priority_1,
                grandmaster.clock_quality,
                grandmaster.priority_2,
                grandmaster.grandmaster_identity,
                grandmaster.steps_removed,
                TIME_SOURCE_INTERNAL_OSCILLATOR,
            );

        if let Err(error) = self.send(&announce) {
            log::error!("Could not send announce: {}", error);
        }
    }

    /// Answer a peer delay request received at the syntonized time `receipt`.
    pub(super) fn handle_pdelay_req(
        &mut self,
        message: &PDelayReqMessage,
        receipt: u32,
    ) -> Result<()> {
        let header = message.header();
        let requester = header.source_port_identity();
        if requester.clock_identity == self.config.port_identity.clock_identity {
            return Err(PortError::SelfOrigin);
        }

        let t2 = self
            .clock
            .read_clock()
            .rewind_to(self.synchronized_receive_time(receipt));
        let response = self
            .message_builder()
            .sequence_id(header.sequence_id())
            .log_message_interval(RESPONSE_LOG_INTERVAL)
            .pdelay_resp_message(t2.into(), requester);
        let transmitted = self.send_event(&response)?;

        let t3 = self
            .clock
            .read_clock()
            .rewind_to(self.synchronized_transmit_time(transmitted));
        let follow_up = self
            .message_builder()
            .sequence_id(header.sequence_id())
            .log_message_interval(RESPONSE_LOG_INTERVAL)
            .pdelay_resp_follow_up_message(t3.into(), requester);
        self.send(&follow_up)
    }
}
