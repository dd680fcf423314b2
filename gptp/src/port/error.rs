use crate::datastructures::{common::PortIdentity, WireFormatError};

pub type Result<T, E = PortError> = core::result::Result<T, E>;

/// Reasons a received frame was not acted upon, or an action failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("not a PTP frame, ethertype {0:#06x}")]
    NotPtp(u16),
    #[error("unsupported PTP version {0}")]
    UnsupportedVersion(u8),
    #[error("wire format error: {0}")]
    WireFormat(#[from] WireFormatError),
    #[error("message originated from this port")]
    SelfOrigin,
    #[error("announce is {0} steps removed from its grandmaster")]
    StepsRemoved(u16),
    #[error("message from unexpected source {0}")]
    UnexpectedSource(PortIdentity),
    #[error("response to a request of {0}")]
    NotForThisPort(PortIdentity),
    #[error("sequence id {received} does not match expected {expected}")]
    SequenceMismatch { expected: u16, received: u16 },
    #[error("message arrived out of order")]
    OutOfOrder,
    #[error("measured link delay of {0}ns out of range")]
    DelayOutOfRange(i64),
    #[error("unsupported log message interval {0}")]
    UnsupportedInterval(i8),
    #[error("something went wrong on the network")]
    Network,
}
