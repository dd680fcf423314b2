//! A transport that queues frames for the simulated link

use std::{cell::RefCell, rc::Rc};

use gptp::{
    datastructures::{frame::Frame, messages::MessageType},
    MessageTransport,
};
use thiserror::Error;

use crate::clock::ClockState;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    #[error("frame of {0} bytes does not fit")]
    FrameTooLong(usize),
    #[error("no {0:?} was sent")]
    NoTimestamp(MessageType),
}

/// Frames sent by a port, waiting to be put on the link
#[derive(Debug)]
pub struct SimTransport {
    clock: Rc<RefCell<ClockState>>,
    outbox: Vec<Frame>,
    last_event: Option<(MessageType, u32)>,
}

impl SimTransport {
    pub fn new(clock: Rc<RefCell<ClockState>>) -> Self {
        Self {
            clock,
            outbox: Vec::new(),
            last_event: None,
        }
    }

    pub fn take_outbox(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.outbox)
    }
}

impl MessageTransport for SimTransport {
    type Error = TransportError;

    fn send(&mut self, message_type: MessageType, frame: &[u8]) -> Result<(), Self::Error> {
        let frame =
            Frame::try_from(frame).map_err(|_| TransportError::FrameTooLong(frame.len()))?;
        if message_type.is_event() {
            self.last_event = Some((message_type, self.clock.borrow().timestamp()));
        }
        self.outbox.push(frame);
        Ok(())
    }

    fn capture_transmit_timestamp(
        &mut self,
        message_type: MessageType,
    ) -> Result<u32, Self::Error> {
        match self.last_event {
            Some((sent_type, timestamp)) if sent_type == message_type => Ok(timestamp),
            _ => Err(TransportError::NoTimestamp(message_type)),
        }
    }
}
