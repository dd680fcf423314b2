use getset::CopyGetters;

use super::Header;
use crate::datastructures::{common::WireTimestamp, WireFormat, WireFormatError};

/// Two-step Sync. The origin timestamp is coarse, the precise one follows
/// in the FollowUp with the same sequence id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct SyncMessage {
    pub(super) header: Header,
    pub(super) origin_timestamp: WireTimestamp,
}

impl SyncMessage {
    pub(crate) fn content_size(&self) -> usize {
        10
    }

    pub(crate) fn serialize_content(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        self.origin_timestamp.serialize(buffer)
    }

    pub(crate) fn deserialize_content(
        header: Header,
        buffer: &[u8],
    ) -> Result<Self, WireFormatError> {
        Ok(Self {
            header,
            origin_timestamp: WireTimestamp::deserialize(buffer)?,
        })
    }
}
