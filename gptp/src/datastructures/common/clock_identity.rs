use crate::datastructures::{WireFormat, WireFormatError};

/// The identity of a gPTP clock.
///
/// Conventionally derived from the port's MAC address (EUI-48 with `ff:fe`
/// inserted in the middle, see IEEE 802.1AS-2020 section 8.5.2.2). Ordering is
/// that of the big-endian 64 bit value, which is what BMCA compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockIdentity(pub [u8; 8]);

impl ClockIdentity {
    /// Build the EUI-64 identity belonging to a MAC address
    pub const fn from_mac_address(mac: [u8; 6]) -> Self {
        Self([mac[0], mac[1], mac[2], 0xff, 0xfe, mac[3], mac[4], mac[5]])
    }

    pub const fn as_u64(self) -> u64 {
        u64::from_be_bytes(self.0)
    }
}

impl core::fmt::Display for ClockIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl WireFormat for ClockIdentity {
    fn wire_size(&self) -> usize {
        8
    }

    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        buffer
            .get_mut(0..8)
            .ok_or(WireFormatError::BufferTooShort)?
            .copy_from_slice(&self.0);
        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        let bytes = buffer.get(0..8).ok_or(WireFormatError::BufferTooShort)?;
        Ok(Self(bytes.try_into().unwrap()))
    }
}
