//! An IEEE 802.1AS (gPTP) time synchronization engine for an end station
//! with a single Ethernet port.
//!
//! The engine is free of I/O and allocation. Integrations implement
//! [`Clock`](clock::Clock) for their hardware real time clock,
//! [`MessageTransport`](network::MessageTransport) for their link layer and
//! [`DiscontinuitySink`](notify::DiscontinuitySink) to learn when timestamps
//! become unreliable, and then drive a [`Port`](port::Port) with ticks and
//! received frames.
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]

pub mod bmc;
pub mod clock;
pub mod config;
pub mod datastructures;
pub mod network;
pub mod notify;
pub mod port;
pub mod servo;
pub mod time;

pub use clock::Clock;
pub use config::{PortConfig, ServoConfig};
pub use network::MessageTransport;
pub use notify::{DiscontinuitySink, IgnoreDiscontinuities};
pub use port::{Port, PortError, Role};
