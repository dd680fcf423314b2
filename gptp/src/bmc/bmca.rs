//! Comparison of grandmaster records
//!
//! This is the dataset comparison of IEEE 802.1AS section 10.3.4 reduced to
//! what an end station needs: every level is a plain "lower wins" comparison
//! and the record with the better value at the first differing level wins.

use core::cmp::Ordering;

use super::GrandmasterRecord;

/// The comparison level that decided in favour of a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TieBreak {
    Priority1,
    ClockQuality,
    Priority2,
    GrandmasterIdentity,
    StepsRemoved,
    SenderIdentity,
    PortNumber,
}

/// Returns whether `candidate` is a better grandmaster than `current`
pub fn compare(candidate: &GrandmasterRecord, current: &GrandmasterRecord) -> bool {
    winning_level(candidate, current).is_some()
}

/// The level at which `candidate` beats `current`, or `None` if it does not
pub fn winning_level(
    candidate: &GrandmasterRecord,
    current: &GrandmasterRecord,
) -> Option<TieBreak> {
    let levels = [
        (
            TieBreak::Priority1,
            candidate.priority_1.cmp(&current.priority_1),
        ),
        (
            TieBreak::ClockQuality,
            candidate
                .clock_quality
                .as_u32()
                .cmp(&current.clock_quality.as_u32()),
        ),
        (
            TieBreak::Priority2,
            candidate.priority_2.cmp(&current.priority_2),
        ),
        (
            TieBreak::GrandmasterIdentity,
            candidate
                .grandmaster_identity
                .as_u64()
                .cmp(&current.grandmaster_identity.as_u64()),
        ),
        (
            TieBreak::StepsRemoved,
            candidate.steps_removed.cmp(&current.steps_removed),
        ),
        (
            TieBreak::SenderIdentity,
            candidate
                .source_port_identity
                .clock_identity
                .cmp(&current.source_port_identity.clock_identity),
        ),
        (
            TieBreak::PortNumber,
            candidate
                .source_port_identity
                .port_number
                .cmp(&current.source_port_identity.port_number),
        ),
    ];

    for (level, ordering) in levels {
        match ordering {
            Ordering::Equal => {}
            Ordering::Greater => return None,
            Ordering::Less => return Some(level),
        }
    }

    None
}
