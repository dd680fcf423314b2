use crate::{
    datastructures::{WireFormat, WireFormatError},
    time::{RtcTime, SubSecond},
};

const SECONDS_MASK: u64 = 0xffff_ffff_ffff;

/// A timestamp as carried in messages: 48 bits of seconds and the nanoseconds
/// within that second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WireTimestamp {
    pub seconds: u64,
    pub nanos: u32,
}

impl WireTimestamp {
    pub const fn sub_second(self) -> SubSecond {
        SubSecond::new(self.nanos)
    }
}

impl From<RtcTime> for WireTimestamp {
    fn from(time: RtcTime) -> Self {
        Self {
            seconds: time.seconds & SECONDS_MASK,
            nanos: time.nanos.nanos(),
        }
    }
}

impl WireFormat for WireTimestamp {
    fn wire_size(&self) -> usize {
        10
    }

    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        let buffer = buffer
            .get_mut(..10)
            .ok_or(WireFormatError::BufferTooShort)?;
        let (seconds, nanos) = buffer.split_at_mut(6);
        seconds.copy_from_slice(&(self.seconds & SECONDS_MASK).to_be_bytes()[2..]);
        nanos.copy_from_slice(&self.nanos.to_be_bytes());
        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        let buffer = buffer.get(..10).ok_or(WireFormatError::BufferTooShort)?;
        let seconds = buffer[..6]
            .iter()
            .fold(0u64, |seconds, &byte| (seconds << 8) | byte as u64);
        let nanos = u32::from_be_bytes([buffer[6], buffer[7], buffer[8], buffer[9]]);
        Ok(Self { seconds, nanos })
    }
}
