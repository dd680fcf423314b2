use num_enum::FromPrimitive;

use crate::datastructures::WireFormatError;

/// Organization identifier of IEEE 802.1 in organization extension TLVs
pub(crate) const IEEE_802_1_ORGANIZATION_ID: [u8; 3] = [0x00, 0x80, 0xc2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u16)]
pub(crate) enum TlvType {
    OrganizationExtension = 0x0003,
    PathTrace = 0x0008,
    #[num_enum(catch_all)]
    Unknown(u16),
}

impl TlvType {
    pub(crate) fn to_primitive(self) -> u16 {
        match self {
            Self::OrganizationExtension => 0x0003,
            Self::PathTrace => 0x0008,
            Self::Unknown(value) => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tlv<'a> {
    pub(crate) tlv_type: TlvType,
    pub(crate) value: &'a [u8],
}

impl<'a> Tlv<'a> {
    pub(crate) fn wire_size(&self) -> usize {
        4 + self.value.len()
    }

    pub(crate) fn serialize(&self, buffer: &mut [u8]) -> Result<usize, WireFormatError> {
        let buffer = buffer
            .get_mut(..self.wire_size())
            .ok_or(WireFormatError::BufferTooShort)?;
        buffer[0..2].copy_from_slice(&self.tlv_type.to_primitive().to_be_bytes());
        buffer[2..4].copy_from_slice(&(self.value.len() as u16).to_be_bytes());
        buffer[4..].copy_from_slice(self.value);
        Ok(self.wire_size())
    }

    pub(crate) fn deserialize(buffer: &'a [u8]) -> Result<Self, WireFormatError> {
        if buffer.len() < 4 {
            return Err(WireFormatError::BufferTooShort);
        }
        let tlv_type = TlvType::from_primitive(u16::from_be_bytes([buffer[0], buffer[1]]));
        let length = u16::from_be_bytes([buffer[2], buffer[3]]) as usize;
        if length % 2 != 0 {
            return Err(WireFormatError::InvalidTlv);
        }
        let value = buffer
            .get(4..4 + length)
            .ok_or(WireFormatError::BufferTooShort)?;
        Ok(Self { tlv_type, value })
    }

    /// The 802.1 organization subtype, if this is an 802.1 extension TLV
    pub(crate) fn ieee_802_1_subtype(&self) -> Option<u32> {
        if self.tlv_type != TlvType::OrganizationExtension || self.value.len() < 6 {
            return None;
        }
        if self.value[0..3] != IEEE_802_1_ORGANIZATION_ID {
            return None;
        }
        Some(u32::from_be_bytes([0, self.value[3], self.value[4], self.value[5]]))
    }
}

/// Iterate over the TLVs following a message body.
///
/// Iteration stops at the first malformed entry, which is yielded as an error.
pub(crate) fn tlvs(mut buffer: &[u8]) -> impl Iterator<Item = Result<Tlv<'_>, WireFormatError>> {
    core::iter::from_fn(move || {
        if buffer.is_empty() {
            return None;
        }
        match Tlv::deserialize(buffer) {
            Ok(tlv) => {
                buffer = &buffer[tlv.wire_size()..];
                Some(Ok(tlv))
            }
            Err(error) => {
                buffer = &[];
                Some(Err(error))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tlv_wireformat() {
        let bytes = [0x00, 0x08, 0x00, 0x08, 1, 2, 3, 4, 5, 6, 7, 8u8];
        let tlv = Tlv::deserialize(&bytes).unwrap();
        assert_eq!(tlv.tlv_type, TlvType::PathTrace);
        assert_eq!(tlv.value, &bytes[4..]);

        let mut buffer = [0; 12];
        assert_eq!(tlv.serialize(&mut buffer), Ok(12));
        assert_eq!(buffer, bytes);
    }

    #[test]
    fn unknown_types_are_preserved() {
        let bytes = [0x12, 0x34, 0x00, 0x00u8];
        let tlv = Tlv::deserialize(&bytes).unwrap();
        assert_eq!(tlv.tlv_type, TlvType::Unknown(0x1234));
        assert_eq!(tlv.tlv_type.to_primitive(), 0x1234);
    }

    #[test]
    fn odd_length_is_invalid() {
        let bytes = [0x00, 0x08, 0x00, 0x01, 0x00, 0x00u8];
        assert_eq!(Tlv::deserialize(&bytes), Err(WireFormatError::InvalidTlv));
    }

    #[test]
    fn iterate_and_stop_on_truncation() {
        let bytes = [
            0x00, 0x03, 0x00, 0x06, 0x00, 0x80, 0xc2, 0x00, 0x00, 0x02, // extension
            0x00, 0x08, 0x00, 0x08, 0x01, // truncated path trace
        ];
        let mut iter = tlvs(&bytes);
        let first = iter.next().unwrap().unwrap();
        assert_eq!(first.ieee_802_1_subtype(), Some(2));
        assert_eq!(iter.next(), Some(Err(WireFormatError::BufferTooShort)));
        assert_eq!(iter.next(), None);
    }
}
