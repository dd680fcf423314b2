//! Common data structures that are used throughout the protocol

mod clock_identity;
mod clock_quality;
mod port_identity;
mod time_interval;
mod timestamp;
mod tlv;

pub use clock_identity::*;
pub use clock_quality::*;
pub use port_identity::*;
pub use time_interval::*;
pub use timestamp::*;
pub(crate) use tlv::*;
