use getset::CopyGetters;

use super::Header;
use crate::datastructures::{
    common::{tlvs, PortIdentity, Tlv, TlvType, IEEE_802_1_ORGANIZATION_ID},
    WireFormat, WireFormatError,
};

const MESSAGE_INTERVAL_REQUEST_SUBTYPE: u32 = 2;
const MESSAGE_INTERVAL_REQUEST_LEN: usize = 12;

/// Log interval values requested by a peer through a message interval
/// request TLV.
///
/// Besides exponents, each field may hold one of the special values
/// 126 (restore initial interval), 127 (stop sending) or -128 (leave
/// unchanged).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageIntervalRequest {
    pub link_delay_interval: i8,
    pub time_sync_interval: i8,
    pub announce_interval: i8,
    pub flags: u8,
}

impl MessageIntervalRequest {
    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        let mut value = [0; MESSAGE_INTERVAL_REQUEST_LEN];
        value[0..3].copy_from_slice(&IEEE_802_1_ORGANIZATION_ID);
        value[3..6].copy_from_slice(&MESSAGE_INTERVAL_REQUEST_SUBTYPE.to_be_bytes()[1..4]);
        value[6] = self.link_delay_interval as u8;
        value[7] = self.time_sync_interval as u8;
        value[8] = self.announce_interval as u8;
        value[9] = self.flags;
        Tlv {
            tlv_type: TlvType::OrganizationExtension,
            value: &value,
        }
        .serialize(buffer)?;
        Ok(())
    }

    fn deserialize(tlv: &Tlv<'_>) -> Option<Self> {
        if tlv.ieee_802_1_subtype() != Some(MESSAGE_INTERVAL_REQUEST_SUBTYPE)
            || tlv.value.len() < MESSAGE_INTERVAL_REQUEST_LEN
        {
            return None;
        }
        Some(Self {
            link_delay_interval: tlv.value[6] as i8,
            time_sync_interval: tlv.value[7] as i8,
            announce_interval: tlv.value[8] as i8,
            flags: tlv.value[9],
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct SignalingMessage {
    pub(super) header: Header,
    pub(super) target_port_identity: PortIdentity,
    pub(super) message_interval_request: Option<MessageIntervalRequest>,
}

impl SignalingMessage {
    pub(crate) fn content_size(&self) -> usize {
        match self.message_interval_request {
            Some(_) => 10 + 4 + MESSAGE_INTERVAL_REQUEST_LEN,
            None => 10,
        }
    }

    pub(crate) fn serialize_content(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        if buffer.len() < self.content_size() {
            return Err(WireFormatError::BufferTooShort);
        }
        self.target_port_identity.serialize(&mut buffer[0..10])?;
        if let Some(request) = &self.message_interval_request {
            request.serialize(&mut buffer[10..])?;
        }
        Ok(())
    }

    pub(crate) fn deserialize_content(
        header: Header,
        buffer: &[u8],
    ) -> Result<Self, WireFormatError> {
        let target_port_identity = PortIdentity::deserialize(buffer)?;

        let mut message_interval_request = None;
        for tlv in tlvs(&buffer[10..]) {
            if let Some(request) = MessageIntervalRequest::deserialize(&tlv?) {
                message_interval_request = Some(request);
            }
        }

        Ok(Self {
            header,
            target_port_identity,
            message_interval_request,
        })
    }
}
