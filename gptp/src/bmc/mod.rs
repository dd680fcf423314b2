//! Best master clock selection

mod bmca;
mod record;

pub use bmca::{compare, winning_level, TieBreak};
pub use record::GrandmasterRecord;
