//! Detect existing occurrences that block a proposed interval.
//!
//! Adjacent occurrences (one ends exactly when the other starts) are NOT
//! conflicts. An occurrence with exactly the same span as the proposal is.

use crate::event::Occurrence;
use crate::interval::TimeInterval;

/// True when `occurrence` blocks a placement at `interval`.
///
/// The occurrence `[s, e)` conflicts when it straddles the proposed start
/// (`s < start && e > start`) or begins inside the proposal
/// (`start <= s < end`).
pub fn blocks(interval: &TimeInterval, occurrence: &Occurrence) -> bool {
    let (start, end) = (interval.start(), interval.end());

    let straddles_start = occurrence.start < start && occurrence.end > start;
    let starts_inside = occurrence.start >= start && occurrence.start < end;

    straddles_start || starts_inside
}

/// Find every occurrence that blocks `interval`, preserving input order.
pub fn find_conflicts<'a>(
    interval: &TimeInterval,
    occurrences: &'a [Occurrence],
) -> Vec<&'a Occurrence> {
    occurrences
        .iter()
        .filter(|occurrence| blocks(interval, occurrence))
        .collect()
}
