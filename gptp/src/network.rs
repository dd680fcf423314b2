//! Definitions of the abstract network types

use crate::datastructures::messages::MessageType;

/// Link layer transmit path of a port
///
/// Frames handed to [`send`](MessageTransport::send) are complete Ethernet
/// frames. The transport must accept a frame whenever it is called; a
/// transport that queues frames has to finish sending a frame before it
/// reports its timestamp.
pub trait MessageTransport {
    type Error: core::fmt::Debug;

    fn send(&mut self, message_type: MessageType, frame: &[u8]) -> Result<(), Self::Error>;

    /// Syntonized nanoseconds at which the last frame of `message_type` left
    /// the timestamp point. Only asked for event messages.
    fn capture_transmit_timestamp(&mut self, message_type: MessageType)
        -> Result<u32, Self::Error>;
}
