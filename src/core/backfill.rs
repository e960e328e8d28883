use crate::models::{MatchTier, Mentor, RankedMentor};
use std::collections::HashSet;

/// Fixed score for backfill candidates.
pub const BACKFILL_SCORE: u8 = 50;
pub const BACKFILL_REASON: &str = "generic recommendation";

/// Deterministic completion of the shortlist: take not-yet-selected
/// mentors in original pool order, up to the outstanding count.
///
/// Never errors. An exhausted pool simply yields fewer entries, leaving
/// the final result shorter than requested.
pub fn select_backfill(
    pool: &[Mentor],
    selected_names: &HashSet<String>,
    count: usize,
) -> Vec<RankedMentor> {
    pool.iter()
        .filter(|mentor| !selected_names.contains(&mentor.name))
        .take(count)
        .map(|mentor| {
            RankedMentor::new(
                mentor.clone(),
                MatchTier::Backfill,
                BACKFILL_SCORE,
                BACKFILL_REASON,
            )
        })
        .collect()
}
