use getset::CopyGetters;

use super::Header;
use crate::datastructures::{
    common::{ClockIdentity, ClockQuality, Tlv, TlvType, WireTimestamp},
    WireFormat, WireFormatError,
};

/// Time source value for a free running oscillator
pub const TIME_SOURCE_INTERNAL_OSCILLATOR: u8 = 0xa0;

const BODY_LEN: usize = 30;
const PATH_TRACE_LEN: usize = 4 + 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct AnnounceMessage {
    pub(super) header: Header,
    pub(super) origin_timestamp: WireTimestamp,
    pub(super) current_utc_offset: i16,
    pub(super) grandmaster_priority_1: u8,
    pub(super) grandmaster_clock_quality: ClockQuality,
    pub(super) grandmaster_priority_2: u8,
    pub(super) grandmaster_identity: ClockIdentity,
    pub(super) steps_removed: u16,
    pub(super) time_source: u8,
}

impl AnnounceMessage {
    pub(crate) fn content_size(&self) -> usize {
        BODY_LEN + PATH_TRACE_LEN
    }

    pub(crate) fn serialize_content(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        if buffer.len() < self.content_size() {
            return Err(WireFormatError::BufferTooShort);
        }
        self.origin_timestamp.serialize(&mut buffer[0..10])?;
        buffer[10..12].copy_from_slice(&self.current_utc_offset.to_be_bytes());
        buffer[12] = 0;
        buffer[13] = self.grandmaster_priority_1;
        self.grandmaster_clock_quality
            .serialize(&mut buffer[14..18])?;
        buffer[18] = self.grandmaster_priority_2;
        self.grandmaster_identity.serialize(&mut buffer[19..27])?;
        buffer[27..29].copy_from_slice(&self.steps_removed.to_be_bytes());
        buffer[29] = self.time_source;

        // We only ever announce from the end of a path, so the trace holds
        // just our own identity.
        let own_identity = self.header.source_port_identity.clock_identity;
        Tlv {
            tlv_type: TlvType::PathTrace,
            value: &own_identity.0,
        }
        .serialize(&mut buffer[BODY_LEN..])?;

        Ok(())
    }

    pub(crate) fn deserialize_content(
        header: Header,
        buffer: &[u8],
    ) -> Result<Self, WireFormatError> {
        if buffer.len() < BODY_LEN {
            return Err(WireFormatError::BufferTooShort);
        }
        Ok(Self {
            header,
            origin_timestamp: WireTimestamp::deserialize(&buffer[0..10])?,
            current_utc_offset: i16::from_be_bytes([buffer[10], buffer[11]]),
            grandmaster_priority_1: buffer[13],
            grandmaster_clock_quality: ClockQuality::deserialize(&buffer[14..18])?,
            grandmaster_priority_2: buffer[18],
            grandmaster_identity: ClockIdentity::deserialize(&buffer[19..27])?,
            steps_removed: u16::from_be_bytes([buffer[27], buffer[28]]),
            time_source: buffer[29],
        })
    }
}
