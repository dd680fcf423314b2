use super::clock_identity::ClockIdentity;
use crate::datastructures::{WireFormat, WireFormatError};

/// A clock identity plus the number of one of its ports, 1 for the first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortIdentity {
    pub clock_identity: ClockIdentity,
    pub port_number: u16,
}

impl core::fmt::Display for PortIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-{}", self.clock_identity, self.port_number)
    }
}

impl WireFormat for PortIdentity {
    fn wire_size(&self) -> usize {
        10
    }

    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        let buffer = buffer
            .get_mut(..10)
            .ok_or(WireFormatError::BufferTooShort)?;
        let (clock, port) = buffer.split_at_mut(8);
        self.clock_identity.serialize(clock)?;
        port.copy_from_slice(&self.port_number.to_be_bytes());
        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        let buffer = buffer.get(..10).ok_or(WireFormatError::BufferTooShort)?;
        Ok(Self {
            clock_identity: ClockIdentity::deserialize(&buffer[..8])?,
            port_number: u16::from_be_bytes([buffer[8], buffer[9]]),
        })
    }
}
