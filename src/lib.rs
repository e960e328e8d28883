//! Mentor Match - tiered mentor matching service for career coaching
//!
//! This library implements the selection cascade used to shortlist
//! mentors for a job-seeker: an exact rule-based tier, an oracle-assisted
//! relevance tier and a deterministic backfill tier.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{MatchError, Matcher, SHORTLIST_SIZE};
pub use crate::models::{MatchQuery, MatchTier, Mentor, RankedMentor};
pub use crate::services::{DashScopeClient, MentorRepository, RelevanceOracle};
