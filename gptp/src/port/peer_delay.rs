//! Peer delay measurement, initiator side
//!
//! Every link delay interval the port sends a PDelayReq (t1), and the peer
//! answers with a PDelayResp carrying its receipt time (t2, our receipt of it
//! is t4) and a PDelayRespFollowUp carrying its transmit time of the response
//! (t3). The mean link delay is half of the round trip minus the peer's
//! turnaround. All four timestamps are nanoseconds within the second.

use super::error::{PortError, Result};
use crate::{
    config::PortConfig,
    datastructures::{
        common::PortIdentity,
        messages::{PDelayRespFollowUpMessage, PDelayRespMessage},
    },
    time::SubSecond,
};

/// Progress of the current peer delay exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerDelayState {
    /// No request is outstanding
    Idle,
    RequestSent {
        sequence_id: u16,
        t1: SubSecond,
    },
    ResponseReceived {
        sequence_id: u16,
        t1: SubSecond,
        t2: SubSecond,
        t4: SubSecond,
        responder: PortIdentity,
    },
    /// Both the response and its follow up arrived
    Complete { responder: PortIdentity },
}

impl PeerDelayState {
    pub fn response_received(&self) -> bool {
        matches!(
            self,
            PeerDelayState::ResponseReceived { .. } | PeerDelayState::Complete { .. }
        )
    }

    pub fn follow_up_received(&self) -> bool {
        matches!(self, PeerDelayState::Complete { .. })
    }
}

#[derive(Debug)]
pub struct PeerDelay {
    state: PeerDelayState,
    link_delay: u32,
    as_capable: bool,
    lost_responses: u8,
    allowed_lost_responses: u8,
    threshold: u32,
}

impl PeerDelay {
    pub fn new(config: &PortConfig) -> Self {
        Self {
            state: PeerDelayState::Idle,
            link_delay: 0,
            as_capable: false,
            lost_responses: 0,
            allowed_lost_responses: config.allowed_lost_responses,
            threshold: config.neighbor_prop_delay_threshold,
        }
    }

    pub fn state(&self) -> PeerDelayState {
        self.state
    }

    /// Last accepted mean link delay in nanoseconds
    pub fn link_delay(&self) -> u32 {
        self.link_delay
    }

    /// Whether the peer is capable of taking part in gPTP
    pub fn is_as_capable(&self) -> bool {
        self.as_capable
    }

    pub fn lost_responses(&self) -> u8 {
        self.lost_responses
    }

    pub(crate) fn set_as_capable(&mut self, as_capable: bool) {
        if as_capable != self.as_capable {
            log::info!("Peer AS capable: {}", as_capable);
            self.as_capable = as_capable;
        }
    }

    /// Close the running exchange, ahead of sending the next request.
    ///
    /// With zero allowed lost responses, the first exchange that does not
    /// complete revokes AS-capability.
    pub(crate) fn finish_exchange(&mut self) {
        if self.state.follow_up_received() {
            self.lost_responses = 0;
        } else {
            self.lost_responses = self
                .lost_responses
                .saturating_add(1)
                .min(self.allowed_lost_responses);
            log::debug!(
                "Peer delay response missing, {} of {} allowed lost",
                self.lost_responses,
                self.allowed_lost_responses
            );
            if self.lost_responses >= self.allowed_lost_responses {
                self.set_as_capable(false);
            }
        }
        self.state = PeerDelayState::Idle;
    }

    pub(crate) fn request_sent(&mut self, sequence_id: u16, t1: SubSecond) {
        self.state = PeerDelayState::RequestSent { sequence_id, t1 };
    }

    /// Handle a PDelayResp received at `t4`, already corrected for receive
    /// latency.
    pub(crate) fn response(
        &mut self,
        message: &PDelayRespMessage,
        t4: SubSecond,
        local: PortIdentity,
    ) -> Result<()> {
        let header = message.header();
        if self.state.response_received() {
            return Err(PortError::OutOfOrder);
        }
        let responder = header.source_port_identity();
        if responder == local {
            // our own request came back, so the link loops
            self.set_as_capable(false);
            return Err(PortError::SelfOrigin);
        }
        let PeerDelayState::RequestSent { sequence_id, t1 } = self.state else {
            return Err(PortError::OutOfOrder);
        };
        let requester = message.requesting_port_identity();
        if requester != local {
            return Err(PortError::NotForThisPort(requester));
        }
        if header.sequence_id() != sequence_id {
            return Err(PortError::SequenceMismatch {
                expected: sequence_id,
                received: header.sequence_id(),
            });
        }

        self.state = PeerDelayState::ResponseReceived {
            sequence_id,
            t1,
            t2: message.request_receipt_timestamp().sub_second(),
            t4,
            responder,
        };
        Ok(())
    }

    /// Handle a PDelayRespFollowUp, returning the newly accepted link delay.
    pub(crate) fn response_follow_up(
        &mut self,
        message: &PDelayRespFollowUpMessage,
        local: PortIdentity,
    ) -> Result<u32> {
        let header = message.header();
        let PeerDelayState::ResponseReceived {
            sequence_id,
            t1,
            t2,
            t4,
            responder,
        } = self.state
        else {
            return Err(PortError::OutOfOrder);
        };
        if header.source_port_identity() != responder {
            return Err(PortError::UnexpectedSource(header.source_port_identity()));
        }
        let requester = message.requesting_port_identity();
        if requester != local {
            return Err(PortError::NotForThisPort(requester));
        }
        if header.sequence_id() != sequence_id {
            return Err(PortError::SequenceMismatch {
                expected: sequence_id,
                received: header.sequence_id(),
            });
        }

        self.state = PeerDelayState::Complete { responder };

        let t3 = message.response_origin_timestamp().sub_second();
        let delay = mean_link_delay(t1, t2, t3, t4);
        if !(0..=self.threshold as i64).contains(&delay) {
            return Err(PortError::DelayOutOfRange(delay));
        }

        log::trace!("Mean link delay {}ns", delay);
        self.link_delay = delay as u32;
        self.set_as_capable(true);
        Ok(self.link_delay)
    }
}

/// Half of the round trip time less the responder's turnaround, which is
/// negative when the turnaround is the larger of the two.
pub fn mean_link_delay(t1: SubSecond, t2: SubSecond, t3: SubSecond, t4: SubSecond) -> i64 {
    let round_trip = t4.since(t1) as i64;
    let turnaround = t3.since(t2) as i64;
    (round_trip - turnaround) / 2
}
