use crate::datastructures::{WireFormat, WireFormatError};

/// Quality of a grandmaster candidate as advertised in Announce messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct ClockQuality {
    pub clock_class: u8,
    pub clock_accuracy: u8,
    pub offset_scaled_log_variance: u16,
}

impl ClockQuality {
    /// The quality fields folded into one value, class in the most
    /// significant byte. Lower is better.
    pub const fn as_u32(self) -> u32 {
        (self.clock_class as u32) << 24
            | (self.clock_accuracy as u32) << 16
            | self.offset_scaled_log_variance as u32
    }
}

impl Default for ClockQuality {
    /// A clock that is not slave-only and has no external time source
    fn default() -> Self {
        Self {
            clock_class: 248,
            clock_accuracy: 0xfe,
            offset_scaled_log_variance: 0x4100,
        }
    }
}

impl WireFormat for ClockQuality {
    fn wire_size(&self) -> usize {
        4
    }

    // the wire layout is the composite value in network byte order
    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        buffer
            .get_mut(..4)
            .ok_or(WireFormatError::BufferTooShort)?
            .copy_from_slice(&self.as_u32().to_be_bytes());
        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        match *buffer {
            [clock_class, clock_accuracy, high, low, ..] => Ok(Self {
                clock_class,
                clock_accuracy,
                offset_scaled_log_variance: u16::from_be_bytes([high, low]),
            }),
            _ => Err(WireFormatError::BufferTooShort),
        }
    }
}
