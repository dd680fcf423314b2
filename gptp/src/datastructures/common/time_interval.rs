use fixed::types::I48F16;

use crate::datastructures::{WireFormat, WireFormatError};

/// Nanoseconds in 48.16 fixed point, the format of the correction field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeInterval(pub I48F16);

impl TimeInterval {
    pub fn from_nanos(nanos: i64) -> Self {
        Self(I48F16::saturating_from_num(nanos))
    }

    /// Whole nanoseconds, rounding towards negative infinity
    pub fn whole_nanos(self) -> i64 {
        self.0.floor().to_num()
    }
}

impl WireFormat for TimeInterval {
    fn wire_size(&self) -> usize {
        8
    }

    fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        buffer
            .get_mut(..8)
            .ok_or(WireFormatError::BufferTooShort)?
            .copy_from_slice(&self.0.to_be_bytes());
        Ok(())
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, WireFormatError> {
        let bytes: [u8; 8] = buffer
            .get(..8)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(WireFormatError::BufferTooShort)?;
        Ok(Self(I48F16::from_be_bytes(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_interval_wireformat() {
        let representations = [
            ([0, 0, 0, 0, 0, 0x02, 0x80, 0x00u8], 2.5f64),
            ([0, 0, 0, 0x01, 0, 0, 0, 0], 65536.0),
            ([0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0, 0], -1.0),
            ([0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0x80, 0], -1.5),
        ];

        for (bytes, nanos) in representations {
            let interval = TimeInterval(I48F16::from_num(nanos));
            let mut buffer = [0; 8];
            interval.serialize(&mut buffer).unwrap();
            assert_eq!(buffer, bytes, "{}", nanos);
            assert_eq!(TimeInterval::deserialize(&bytes), Ok(interval));
        }
    }

    #[test]
    fn short_buffer_is_rejected() {
        assert_eq!(
            TimeInterval::deserialize(&[0; 7]),
            Err(WireFormatError::BufferTooShort)
        );
        assert_eq!(
            TimeInterval::default().serialize(&mut [0; 7]),
            Err(WireFormatError::BufferTooShort)
        );
    }

    #[test]
    fn whole_nanos_floor() {
        assert_eq!(TimeInterval(I48F16::from_num(2.5f64)).whole_nanos(), 2);
        assert_eq!(TimeInterval(I48F16::from_num(-2.5f64)).whole_nanos(), -3);
        assert_eq!(TimeInterval::from_nanos(1234).whole_nanos(), 1234);
    }
}
