use getset::CopyGetters;

use super::Header;
use crate::datastructures::WireFormatError;

/// Peer delay request. The body is 20 reserved bytes in 802.1AS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct PDelayReqMessage {
    pub(super) header: Header,
}

impl PDelayReqMessage {
    pub(crate) fn content_size(&self) -> usize {
        20
    }

    pub(crate) fn serialize_content(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        buffer
            .get_mut(..20)
            .ok_or(WireFormatError::BufferTooShort)?
            .fill(0);
        Ok(())
    }

    pub(crate) fn deserialize_content(
        header: Header,
        buffer: &[u8],
    ) -> Result<Self, WireFormatError> {
        if buffer.len() < 20 {
            return Err(WireFormatError::BufferTooShort);
        }
        Ok(Self { header })
    }
}
