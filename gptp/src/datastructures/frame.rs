//! Ethernet II framing of gPTP messages

use arrayvec::ArrayVec;

use super::WireFormatError;

pub type MacAddress = [u8; 6];

/// Ethertype assigned to PTP over IEEE 802.3
pub const PTP_ETHERTYPE: u16 = 0x88f7;

/// Destination of all gPTP messages: the nearest-bridge group address, which
/// bridges never forward.
pub const GPTP_MULTICAST_ADDRESS: MacAddress = [0x01, 0x80, 0xc2, 0x00, 0x00, 0x0e];

pub const ETHERNET_HEADER_LEN: usize = 14;

/// Upper bound on the size of any frame the engine transmits.
pub const MAX_FRAME_LEN: usize = 128;

/// A serialized frame, ready for transmission
pub type Frame = ArrayVec<u8, MAX_FRAME_LEN>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    pub destination: MacAddress,
    pub source: MacAddress,
    pub ethertype: u16,
}

impl EthernetHeader {
    pub const fn gptp(source: MacAddress) -> Self {
        Self {
            destination: GPTP_MULTICAST_ADDRESS,
            source,
            ethertype: PTP_ETHERTYPE,
        }
    }

    pub fn serialize(&self, buffer: &mut [u8]) -> Result<(), WireFormatError> {
        if buffer.len() < ETHERNET_HEADER_LEN {
            return Err(WireFormatError::BufferTooShort);
        }
        buffer[0..6].copy_from_slice(&self.destination);
        buffer[6..12].copy_from_slice(&self.source);
        buffer[12..14].copy_from_slice(&self.ethertype.to_be_bytes());
        Ok(())
    }

    /// Split a received frame into its Ethernet header and payload
    pub fn split(frame: &[u8]) -> Result<(Self, &[u8]), WireFormatError> {
        if frame.len() < ETHERNET_HEADER_LEN {
            return Err(WireFormatError::BufferTooShort);
        }
        let header = Self {
            destination: frame[0..6].try_into().unwrap(),
            source: frame[6..12].try_into().unwrap(),
            ethertype: u16::from_be_bytes([frame[12], frame[13]]),
        };
        Ok((header, &frame[ETHERNET_HEADER_LEN..]))
    }
}
