//! Simulation of two gPTP end stations on a point-to-point link, for
//! exercising the `gptp` engine without hardware.

pub mod clock;
pub mod config;
pub mod simulation;
pub mod transport;
