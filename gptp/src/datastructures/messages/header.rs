use getset::CopyGetters;

use super::MessageType;
use crate::datastructures::{
    common::{PortIdentity, TimeInterval},
    WireFormat, WireFormatError,
};

pub const HEADER_LEN: usize = 34;

/// `transportSpecific` of every 802.1AS message
pub const GPTP_TRANSPORT_SPECIFIC: u8 = 0x1;

/// The common header in front of every gPTP message.
///
/// 802.1AS only uses domain 0 and never sets the minor sdo id, so those are
/// not represented. Message type and length follow from the body and are
/// filled in when serializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Header {
    pub(crate) transport_specific: u8,
    pub(crate) version: u8,
    pub(crate) minor_version: u8,
    pub(crate) flags: Flags,
    pub(crate) correction_field: TimeInterval,
    pub(crate) source_port_identity: PortIdentity,
    pub(crate) sequence_id: u16,
    pub(crate) log_message_interval: i8,
}

/// A header together with the fields that describe its body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeserializedHeader {
    pub header: Header,
    pub message_type: MessageType,
    pub message_length: u16,
}

impl Header {
    pub(super) fn new() -> Self {
        Self {
            transport_specific: GPTP_TRANSPORT_SPECIFIC,
            version: 2,
            minor_version: 0,
            flags: Flags::default(),
            correction_field: TimeInterval::default(),
            source_port_identity: PortIdentity::default(),
            sequence_id: 0,
            log_message_interval: 0,
        }
    }

    pub fn two_step_flag(&self) -> bool {
        self.flags.contains(Flags::TWO_STEP)
    }

    pub fn ptp_timescale(&self) -> bool {
        self.flags.contains(Flags::PTP_TIMESCALE)
    }

    pub fn wire_size(&self) -> usize {
        HEADER_LEN
    }

    pub fn serialize_header(
        &self,
        content_type: MessageType,
        content_length: usize,
        buffer: &mut [u8],
    ) -> Result<(), WireFormatError> {
        let buffer = buffer
            .get_mut(..HEADER_LEN)
            .ok_or(WireFormatError::BufferTooShort)?;
        let message_length = (HEADER_LEN + content_length) as u16;

        buffer[0] = (self.transport_specific << 4) | (u8::from(content_type) & 0x0f);
        buffer[1] = (self.minor_version << 4) | (self.version & 0x0f);
        buffer[2..4].copy_from_slice(&message_length.to_be_bytes());
        // domain number and minor sdo id
        buffer[4..6].fill(0);
        buffer[6..8].copy_from_slice(&self.flags.0.to_be_bytes());
        self.correction_field.serialize(&mut buffer[8..16])?;
        // messageTypeSpecific
        buffer[16..20].fill(0);
        self.source_port_identity.serialize(&mut buffer[20..30])?;
        buffer[30..32].copy_from_slice(&self.sequence_id.to_be_bytes());
        buffer[32] = content_type.control_field();
        buffer[33] = self.log_message_interval as u8;

        Ok(())
    }

    pub fn deserialize_header(buffer: &[u8]) -> Result<DeserializedHeader, WireFormatError> {
        let buffer = buffer
            .get(..HEADER_LEN)
            .ok_or(WireFormatError::BufferTooShort)?;

        let header = Header {
            transport_specific: buffer[0] >> 4,
            version: buffer[1] & 0x0f,
            minor_version: buffer[1] >> 4,
            flags: Flags(u16::from_be_bytes([buffer[6], buffer[7]])),
            correction_field: TimeInterval::deserialize(&buffer[8..16])?,
            source_port_identity: PortIdentity::deserialize(&buffer[20..30])?,
            sequence_id: u16::from_be_bytes([buffer[30], buffer[31]]),
            log_message_interval: buffer[33] as i8,
        };

        Ok(DeserializedHeader {
            header,
            message_type: (buffer[0] & 0x0f).try_into()?,
            message_length: u16::from_be_bytes([buffer[2], buffer[3]]),
        })
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

/// The two `flagField` octets, with the first octet in the high byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Flags(pub u16);

impl Flags {
    pub const ALTERNATE_MASTER: Self = Self(0x0100);
    pub const TWO_STEP: Self = Self(0x0200);
    pub const UNICAST: Self = Self(0x0400);
    pub const PROFILE_SPECIFIC_1: Self = Self(0x2000);
    pub const PROFILE_SPECIFIC_2: Self = Self(0x4000);
    pub const LEAP_61: Self = Self(0x0001);
    pub const LEAP_59: Self = Self(0x0002);
    pub const CURRENT_UTC_OFFSET_VALID: Self = Self(0x0004);
    pub const PTP_TIMESCALE: Self = Self(0x0008);
    pub const TIME_TRACEABLE: Self = Self(0x0010);
    pub const FREQUENCY_TRACEABLE: Self = Self(0x0020);

    pub fn contains(self, flag: Flags) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn set(&mut self, flag: Flags, value: bool) {
        if value {
            self.0 |= flag.0;
        } else {
            self.0 &= !flag.0;
        }
    }
}
