//! Configuration of a gPTP port

mod port;
mod servo;

pub use port::PortConfig;
pub use servo::ServoConfig;
