//! gPTP network messages

use num_enum::{IntoPrimitive, TryFromPrimitive};

mod announce;
mod follow_up;
mod header;
mod message_builder;
mod p_delay_req;
mod p_delay_resp;
mod signaling;
mod sync;

pub use announce::*;
pub use follow_up::*;
pub use header::*;
pub use message_builder::*;
pub use p_delay_req::*;
pub use p_delay_resp::*;
pub use signaling::*;
pub use sync::*;

use super::{
    frame::{EthernetHeader, Frame, MacAddress, ETHERNET_HEADER_LEN, MAX_FRAME_LEN},
    WireFormatError,
};

/// Message types used by 802.1AS. The end-to-end delay mechanism and
/// management messages of IEEE 1588 do not exist in gPTP.
#[derive(Debug, Clone, Copy, TryFromPrimitive, IntoPrimitive, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    Sync = 0x0,
    PDelayReq = 0x2,
    PDelayResp = 0x3,
    FollowUp = 0x8,
    PDelayRespFollowUp = 0xA,
    Announce = 0xB,
    Signaling = 0xC,
}

impl MessageType {
    /// Event messages are timestamped by the hardware on transmit and receive
    pub fn is_event(self) -> bool {
        matches!(self, Self::Sync | Self::PDelayReq | Self::PDelayResp)
    }

    /// The deprecated `controlField` of IEEE 1588-2008
    pub(crate) fn control_field(self) -> u8 {
        match self {
            Self::Sync => 0x00,
            Self::FollowUp => 0x02,
            _ => 0x05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Sync(SyncMessage),
    FollowUp(FollowUpMessage),
    PDelayReq(PDelayReqMessage),
    PDelayResp(PDelayRespMessage),
    PDelayRespFollowUp(PDelayRespFollowUpMessage),
    Announce(AnnounceMessage),
    Signaling(SignalingMessage),
}

impl Message {
    pub fn builder() -> MessageBuilder {
        MessageBuilder::new()
    }

    pub fn header(&self) -> &Header {
        match self {
            Message::Sync(m) => &m.header,
            Message::FollowUp(m) => &m.header,
            Message::PDelayReq(m) => &m.header,
            Message::PDelayResp(m) => &m.header,
            Message::PDelayRespFollowUp(m) => &m.header,
            Message::Announce(m) => &m.header,
            Message::Signaling(m) => &m.header,
        }
    }

    /// The byte size on the wire of this message
    pub fn wire_size(&self) -> usize {
        self.header().wire_size() + self.content_size()
    }

    fn content_size(&self) -> usize {
        match self {
            Message::Sync(m) => m.content_size(),
            Message::FollowUp(m) => m.content_size(),
            Message::PDelayReq(m) => m.content_size(),
            Message::PDelayResp(m) => m.content_size(),
            Message::PDelayRespFollowUp(m) => m.content_size(),
            Message::Announce(m) => m.content_size(),
            Message::Signaling(m) => m.content_size(),
        }
    }

    pub fn content_type(&self) -> MessageType {
        match self {
            Message::Sync(_) => MessageType::Sync,
            Message::FollowUp(_) => MessageType::FollowUp,
            Message::PDelayReq(_) => MessageType::PDelayReq,
            Message::PDelayResp(_) => MessageType::PDelayResp,
            Message::PDelayRespFollowUp(_) => MessageType::PDelayRespFollowUp,
            Message::Announce(_) => MessageType::Announce,
            Message::Signaling(_) => MessageType::Signaling,
        }
    }

    /// Serializes the object into the PTP wire format.
    ///
    /// Returns the used buffer size that contains the message or an error.
    pub fn serialize(&self, buffer: &mut [u8]) -> Result<usize, WireFormatError> {
        let wire_size = self.wire_size();
        if buffer.len() < wire_size {
            return Err(WireFormatError::BufferTooShort);
        }
        self.header().serialize_header(
            self.content_type(),
            self.content_size(),
            &mut buffer[0..HEADER_LEN],
        )?;
        let content = &mut buffer[HEADER_LEN..wire_size];
        match self {
            Message::Sync(m) => m.serialize_content(content),
            Message::FollowUp(m) => m.serialize_content(content),
            Message::PDelayReq(m) => m.serialize_content(content),
            Message::PDelayResp(m) => m.serialize_content(content),
            Message::PDelayRespFollowUp(m) => m.serialize_content(content),
            Message::Announce(m) => m.serialize_content(content),
            Message::Signaling(m) => m.serialize_content(content),
        }?;
        Ok(wire_size)
    }

    /// Serializes the message behind a gPTP Ethernet header.
    ///
    /// Returns the total frame length.
    pub fn serialize_frame(
        &self,
        source: MacAddress,
        buffer: &mut [u8],
    ) -> Result<usize, WireFormatError> {
        if buffer.len() < ETHERNET_HEADER_LEN {
            return Err(WireFormatError::BufferTooShort);
        }
        EthernetHeader::gptp(source).serialize(&mut buffer[..ETHERNET_HEADER_LEN])?;
        let length = self.serialize(&mut buffer[ETHERNET_HEADER_LEN..])?;
        Ok(ETHERNET_HEADER_LEN + length)
    }

    /// Serializes the message into a complete Ethernet frame
    pub fn to_frame(&self, source: MacAddress) -> Result<Frame, WireFormatError> {
        let mut frame = Frame::from([0; MAX_FRAME_LEN]);
        let length = self.serialize_frame(source, &mut frame)?;
        frame.truncate(length);
        Ok(frame)
    }

    /// Deserializes a message from the PTP wire format.
    ///
    /// Returns the message or an error.
    pub fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        let header_data = Header::deserialize_header(buffer)?;

        // Trailing bytes beyond the message length are Ethernet padding
        let message_length = header_data.message_length as usize;
        let end = if message_length >= HEADER_LEN && message_length <= buffer.len() {
            message_length
        } else {
            buffer.len()
        };
        let content_buffer = &buffer[HEADER_LEN..end];
        let header = header_data.header;

        Ok(match header_data.message_type {
            MessageType::Sync => {
                Message::Sync(SyncMessage::deserialize_content(header, content_buffer)?)
            }
            MessageType::FollowUp => Message::FollowUp(FollowUpMessage::deserialize_content(
                header,
                content_buffer,
            )?),
            MessageType::PDelayReq => Message::PDelayReq(PDelayReqMessage::deserialize_content(
                header,
                content_buffer,
            )?),
            MessageType::PDelayResp => Message::PDelayResp(
                PDelayRespMessage::deserialize_content(header, content_buffer)?,
            ),
            MessageType::PDelayRespFollowUp => Message::PDelayRespFollowUp(
                PDelayRespFollowUpMessage::deserialize_content(header, content_buffer)?,
            ),
            MessageType::Announce => Message::Announce(AnnounceMessage::deserialize_content(
                header,
                content_buffer,
            )?),
            MessageType::Signaling => Message::Signaling(SignalingMessage::deserialize_content(
                header,
                content_buffer,
            )?),
        })
    }
}
