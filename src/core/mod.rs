// Core algorithm exports
pub mod backfill;
pub mod filters;
pub mod matcher;
pub mod ranker;

pub use backfill::select_backfill;
pub use filters::{matches_direction, matches_position, matches_request, select_exact};
pub use matcher::{MatchError, Matcher, SHORTLIST_SIZE};
pub use ranker::{build_rubric, rank_candidates, resolve_entries, strip_code_fences};
