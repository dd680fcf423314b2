use getset::CopyGetters;

use super::Header;
use crate::datastructures::{
    common::{Tlv, TlvType, WireTimestamp, IEEE_802_1_ORGANIZATION_ID},
    WireFormat, WireFormatError,
};

/// Organization subtype of the 802.1AS Follow_Up information TLV
const FOLLOW_UP_INFORMATION_SUBTYPE: [u8; 3] = [0x00, 0x00, 0x01];
const FOLLOW_UP_INFORMATION_LEN: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct FollowUpMessage {
    pub(super) header: Header,
    pub(super) precise_origin_timestamp: WireTimestamp,
}

impl FollowUpMessage {
    pub(crate) fn content_size(&self) -> usize {
        10 + 4 + FOLLOW_UP_INFORMATION_LEN
    }

    pub(crate) fn serialize_content(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        if buffer.len() < self.content_size() {
            return Err(WireFormatError::BufferTooShort);
        }
        self.precise_origin_timestamp
            .serialize(&mut buffer[0..10])?;

        // We never act as a relay, so the rate ratio and grandmaster change
        // fields are all zero.
        let mut information = [0; FOLLOW_UP_INFORMATION_LEN];
        information[0..3].copy_from_slice(&IEEE_802_1_ORGANIZATION_ID);
        information[3..6].copy_from_slice(&FOLLOW_UP_INFORMATION_SUBTYPE);
        Tlv {
            tlv_type: TlvType::OrganizationExtension,
            value: &information,
        }
        .serialize(&mut buffer[10..])?;

        Ok(())
    }

    pub(crate) fn deserialize_content(
        header: Header,
        buffer: &[u8],
    ) -> Result<Self, WireFormatError> {
        Ok(Self {
            header,
            precise_origin_timestamp: WireTimestamp::deserialize(buffer)?,
        })
    }
}
