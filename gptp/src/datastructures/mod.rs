//! Wire representation of gPTP frames and messages

use core::fmt::Debug;

pub mod common;
pub mod frame;
pub mod messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WireFormatError {
    #[error("enum conversion failed")]
    EnumConversionError,
    #[error("buffer too short")]
    BufferTooShort,
    #[error("malformed tlv")]
    InvalidTlv,
}

impl<Enum: num_enum::TryFromPrimitive> From<num_enum::TryFromPrimitiveError<Enum>>
    for WireFormatError
{
    fn from(_: num_enum::TryFromPrimitiveError<Enum>) -> Self {
        Self::EnumConversionError
    }
}

pub(crate) trait WireFormat: Debug + Clone + Eq {
    /// The byte size on the wire of this object
    fn wire_size(&self) -> usize;

    /// Serializes the object into the PTP wire format.
    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError>;

    /// Deserializes the object from the PTP wire format.
    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError>;
}
