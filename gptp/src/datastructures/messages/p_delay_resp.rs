//! The two responses of the peer delay exchange share one body layout: a
//! timestamp followed by the identity of the port that made the request.

use getset::CopyGetters;

use super::Header;
use crate::datastructures::{
    common::{PortIdentity, WireTimestamp},
    WireFormat, WireFormatError,
};

const RESPONSE_BODY_LEN: usize = 20;

fn serialize_response(
    timestamp: WireTimestamp,
    requesting_port_identity: PortIdentity,
    buffer: &mut [u8],
) -> Result<(), WireFormatError> {
    let body = buffer
        .get_mut(..RESPONSE_BODY_LEN)
        .ok_or(WireFormatError::BufferTooShort)?;
    let (timestamp_bytes, identity_bytes) = body.split_at_mut(10);
    timestamp.serialize(timestamp_bytes)?;
    requesting_port_identity.serialize(identity_bytes)
}

fn deserialize_response(buffer: &[u8]) -> Result<(WireTimestamp, PortIdentity), WireFormatError> {
    let body = buffer
        .get(..RESPONSE_BODY_LEN)
        .ok_or(WireFormatError::BufferTooShort)?;
    let (timestamp_bytes, identity_bytes) = body.split_at(10);
    Ok((
        WireTimestamp::deserialize(timestamp_bytes)?,
        PortIdentity::deserialize(identity_bytes)?,
    ))
}

/// Answer to a peer delay request, carrying when the request was received (t2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct PDelayRespMessage {
    pub(super) header: Header,
    pub(super) request_receipt_timestamp: WireTimestamp,
    pub(super) requesting_port_identity: PortIdentity,
}

impl PDelayRespMessage {
    pub(crate) fn content_size(&self) -> usize {
        RESPONSE_BODY_LEN
    }

    pub(crate) fn serialize_content(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        serialize_response(
            self.request_receipt_timestamp,
            self.requesting_port_identity,
            buffer,
        )
    }

    pub(crate) fn deserialize_content(
        header: Header,
        buffer: &[u8],
    ) -> Result<Self, WireFormatError> {
        let (request_receipt_timestamp, requesting_port_identity) = deserialize_response(buffer)?;
        Ok(Self {
            header,
            request_receipt_timestamp,
            requesting_port_identity,
        })
    }
}

/// Carries when the matching response was transmitted (t3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct PDelayRespFollowUpMessage {
    pub(super) header: Header,
    pub(super) response_origin_timestamp: WireTimestamp,
    pub(super) requesting_port_identity: PortIdentity,
}

impl PDelayRespFollowUpMessage {
    pub(crate) fn content_size(&self) -> usize {
        RESPONSE_BODY_LEN
    }

    pub(crate) fn serialize_content(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        serialize_response(
            self.response_origin_timestamp,
            self.requesting_port_identity,
            buffer,
        )
    }

    pub(crate) fn deserialize_content(
        header: Header,
        buffer: &[u8],
    ) -> Result<Self, WireFormatError> {
        let (response_origin_timestamp, requesting_port_identity) = deserialize_response(buffer)?;
        Ok(Self {
            header,
            response_origin_timestamp,
            requesting_port_identity,
        })
    }
}
