//! Reception of Sync and FollowUp while slave

use super::{
    error::{PortError, Result},
    Port, Role,
};
use crate::{
    clock::Clock,
    datastructures::messages::{FollowUpMessage, Header, SyncMessage},
    network::MessageTransport,
    notify::DiscontinuitySink,
    servo::SyncMeasurement,
    time::{Interval, SubSecond},
};

/// A Sync waiting for its FollowUp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct PendingSync {
    sequence_id: u16,
    /// Syntonized receive time, corrected for receive latency
    receipt: SubSecond,
}

impl<'s, C: Clock, T: MessageTransport, S: DiscontinuitySink> Port<'s, C, T, S> {
    /// Only syncs of the grandmaster's port matter, and only to a slave.
    fn accept_from_master(&self, header: &Header) -> Result<bool> {
        if self.role != Role::Slave {
            return Ok(false);
        }
        let source = header.source_port_identity();
        if source != self.grandmaster.source_port_identity {
            return Err(PortError::UnexpectedSource(source));
        }
        Ok(true)
    }

    pub(super) fn handle_sync(&mut self, message: &SyncMessage, receipt: u32) -> Result<()> {
        let header = message.header();
        if !self.accept_from_master(&header)? {
            return Ok(());
        }

        self.counters.sync = 0;
        if let Some(interval) = Interval::from_log_2(header.log_message_interval()) {
            self.sync_receipt_interval = interval.as_ticks();
        }

        let (receipt, _) = SubSecond::new(receipt).wrapping_sub(self.config.rx_latency);
        self.pending_sync = Some(PendingSync {
            sequence_id: header.sequence_id(),
            receipt,
        });
        Ok(())
    }

    pub(super) fn handle_follow_up(&mut self, message: &FollowUpMessage) -> Result<()> {
        let header = message.header();
        if !self.accept_from_master(&header)? {
            return Ok(());
        }

        let pending = self.pending_sync.ok_or(PortError::OutOfOrder)?;
        if header.sequence_id() != pending.sequence_id {
            return Err(PortError::SequenceMismatch {
                expected: pending.sequence_id,
                received: header.sequence_id(),
            });
        }
        self.pending_sync = None;

        let origin = message.precise_origin_timestamp();
        let measurement = SyncMeasurement {
            origin_seconds: origin.seconds,
            origin: origin.sub_second(),
            correction: header.correction_field().whole_nanos(),
            link_delay: self.peer_delay.link_delay(),
            receipt: pending.receipt,
            sequence_id: pending.sequence_id,
        };
        if let Some(locked) = self.servo.measurement(measurement, &mut self.clock) {
            self.lock_changed(locked);
        }
        Ok(())
    }
}
