use super::{
    AnnounceMessage, Flags, FollowUpMessage, Header, Message, MessageIntervalRequest,
    PDelayReqMessage, PDelayRespFollowUpMessage, PDelayRespMessage, SignalingMessage,
    SyncMessage,
};
use crate::datastructures::common::{
    ClockIdentity, ClockQuality, PortIdentity, TimeInterval, WireTimestamp,
};

/// A builder to build messages with.
///
/// The length and message type fields of the header are derived from the
/// content when serializing, so a built message is always consistent.
pub struct MessageBuilder {
    header: Header,
}

impl MessageBuilder {
    /// Start the process of building a new message
    pub fn new() -> MessageBuilder {
        MessageBuilder {
            header: Header::new(),
        }
    }

    pub fn two_step_flag(mut self, two_step_flag: bool) -> Self {
        self.header.flags.set(Flags::TWO_STEP, two_step_flag);
        self
    }

    pub fn ptp_timescale(mut self, ptp_timescale: bool) -> Self {
        self.header.flags.set(Flags::PTP_TIMESCALE, ptp_timescale);
        self
    }

    pub fn correction_field(mut self, correction_field: TimeInterval) -> Self {
        self.header.correction_field = correction_field;
        self
    }

    pub fn source_port_identity(mut self, source_port_identity: PortIdentity) -> Self {
        self.header.source_port_identity = source_port_identity;
        self
    }

    pub fn sequence_id(mut self, sequence_id: u16) -> Self {
        self.header.sequence_id = sequence_id;
        self
    }

    pub fn log_message_interval(mut self, log_message_interval: i8) -> Self {
        self.header.log_message_interval = log_message_interval;
        self
    }

    pub fn sync_message(self, origin_timestamp: WireTimestamp) -> Message {
        Message::Sync(SyncMessage {
            header: self.header,
            origin_timestamp,
        })
    }

    pub fn follow_up_message(self, precise_origin_timestamp: WireTimestamp) -> Message {
        Message::FollowUp(FollowUpMessage {
            header: self.header,
            precise_origin_timestamp,
        })
    }

    pub fn pdelay_req_message(self) -> Message {
        Message::PDelayReq(PDelayReqMessage {
            header: self.header,
        })
    }

    pub fn pdelay_resp_message(
        self,
        request_receipt_timestamp: WireTimestamp,
        requesting_port_identity: PortIdentity,
    ) -> Message {
        Message::PDelayResp(PDelayRespMessage {
            header: self.header,
            request_receipt_timestamp,
            requesting_port_identity,
        })
    }

    pub fn pdelay_resp_follow_up_message(
        self,
        response_origin_timestamp: WireTimestamp,
        requesting_port_identity: PortIdentity,
    ) -> Message {
        Message::PDelayRespFollowUp(PDelayRespFollowUpMessage {
            header: self.header,
            response_origin_timestamp,
            requesting_port_identity,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn announce_message(
        self,
        origin_timestamp: WireTimestamp,
        current_utc_offset: i16,
        grandmaster_priority_1: u8,
        grandmaster_clock_quality: ClockQuality,
        grandmaster_priority_2: u8,
        grandmaster_identity: ClockIdentity,
        steps_removed: u16,
        time_source: u8,
    ) -> Message {
        Message::Announce(AnnounceMessage {
            header: self.header,
            origin_timestamp,
            current_utc_offset,
            grandmaster_priority_1,
            grandmaster_clock_quality,
            grandmaster_priority_2,
            grandmaster_identity,
            steps_removed,
            time_source,
        })
    }

    pub fn signaling_message(
        self,
        target_port_identity: PortIdentity,
        message_interval_request: Option<MessageIntervalRequest>,
    ) -> Message {
        Message::Signaling(SignalingMessage {
            header: self.header,
            target_port_identity,
            message_interval_request,
        })
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        MessageBuilder::new()
    }
}
