use crate::core::{backfill, filters, ranker};
use crate::models::{MatchQuery, Mentor, RankedMentor};
use crate::services::RelevanceOracle;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

/// Target shortlist length. The result is shorter only when the whole
/// pool is smaller.
pub const SHORTLIST_SIZE: usize = 5;

/// Errors surfaced to the caller by the selection orchestrator
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("direction is required")]
    InvalidRequest,
}

/// Selection orchestrator - runs the exact/oracle/backfill cascade
///
/// # Cascade stages
/// 1. Exact tier over the full pool (direction + role rules)
/// 2. Oracle-assisted ranking of the complement, only if slots remain
/// 3. Deterministic backfill in pool order for any still-open slots
#[derive(Debug, Clone)]
pub struct Matcher {
    shortlist_size: usize,
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            shortlist_size: SHORTLIST_SIZE,
        }
    }

    /// Select the shortlist for a request.
    ///
    /// Fails only on an empty direction. Oracle unavailability degrades
    /// to backfill; an empty pool yields an empty (legal) result. For a
    /// fixed pool snapshot and a deterministic oracle the result is
    /// stable across calls.
    pub async fn select_mentors<O>(
        &self,
        query: &MatchQuery,
        pool: &[Mentor],
        oracle: &O,
    ) -> Result<Vec<RankedMentor>, MatchError>
    where
        O: RelevanceOracle + ?Sized,
    {
        if query.direction.trim().is_empty() {
            return Err(MatchError::InvalidRequest);
        }

        let mut shortlist = filters::select_exact(pool, query);
        info!(
            "Exact tier matched {} of {} mentors for direction {:?}",
            shortlist.len(),
            pool.len(),
            query.direction
        );

        if shortlist.len() >= self.shortlist_size {
            shortlist.truncate(self.shortlist_size);
            return Ok(shortlist);
        }

        let mut selected: HashSet<String> = shortlist
            .iter()
            .map(|ranked| ranked.mentor.name.clone())
            .collect();

        let candidates: Vec<&Mentor> = pool
            .iter()
            .filter(|mentor| !selected.contains(&mentor.name))
            .collect();
        let remaining = self.shortlist_size - shortlist.len();

        let ranked = ranker::rank_candidates(oracle, query, &candidates, remaining).await;
        debug!("Oracle tier supplied {} mentors", ranked.len());
        for candidate in ranked {
            // the oracle may repeat an index; the selected set keeps the
            // shortlist free of duplicate names
            if selected.insert(candidate.mentor.name.clone()) {
                shortlist.push(candidate);
            }
        }

        if shortlist.len() < self.shortlist_size {
            let outstanding = self.shortlist_size - shortlist.len();
            let filled = backfill::select_backfill(pool, &selected, outstanding);
            debug!("Backfill tier supplied {} mentors", filled.len());
            shortlist.extend(filled);
        }

        shortlist.truncate(self.shortlist_size);
        Ok(shortlist)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backfill::BACKFILL_SCORE;
    use crate::core::filters::EXACT_SCORE;
    use crate::models::MatchTier;
    use crate::services::OracleError;
    use async_trait::async_trait;

    /// Oracle stub returning a fixed response, or failing when given none.
    struct StubOracle(Option<String>);

    #[async_trait]
    impl RelevanceOracle for StubOracle {
        async fn complete(&self, _prompt: &str) -> Result<String, OracleError> {
            match &self.0 {
                Some(text) => Ok(text.clone()),
                None => Err(OracleError::ApiError("oracle unavailable".to_string())),
            }
        }
    }

    /// Oracle stub that must never be reached.
    struct UnreachableOracle;

    #[async_trait]
    impl RelevanceOracle for UnreachableOracle {
        async fn complete(&self, _prompt: &str) -> Result<String, OracleError> {
            panic!("oracle must not be invoked when the exact tier is full");
        }
    }

    fn mentor(name: &str, direction: Option<&str>) -> Mentor {
        Mentor {
            name: name.to_string(),
            direction: direction.map(str::to_string),
            position: None,
            company: None,
            education: None,
            information: None,
            keywords: None,
        }
    }

    #[tokio::test]
    async fn test_empty_direction_is_invalid_request() {
        let matcher = Matcher::new();
        let query = MatchQuery::new("  ", None);

        let result = matcher
            .select_mentors(&query, &[], &StubOracle(None))
            .await;
        assert!(matches!(result, Err(MatchError::InvalidRequest)));
    }

    #[tokio::test]
    async fn test_full_exact_tier_skips_oracle() {
        let pool: Vec<Mentor> = (0..7)
            .map(|i| mentor(&format!("m{}", i), Some("金融")))
            .collect();
        let query = MatchQuery::new("金融", None);

        let shortlist = Matcher::new()
            .select_mentors(&query, &pool, &UnreachableOracle)
            .await
            .unwrap();

        assert_eq!(shortlist.len(), 5);
        let names: Vec<&str> = shortlist.iter().map(|r| r.mentor.name.as_str()).collect();
        assert_eq!(names, vec!["m0", "m1", "m2", "m3", "m4"]);
        assert!(shortlist
            .iter()
            .all(|r| r.tier == MatchTier::Exact && r.score == EXACT_SCORE));
    }

    #[tokio::test]
    async fn test_oracle_failure_degrades_to_backfill() {
        let pool: Vec<Mentor> = (0..6)
            .map(|i| mentor(&format!("m{}", i), Some("互联网")))
            .collect();
        let query = MatchQuery::new("金融", None);

        let shortlist = Matcher::new()
            .select_mentors(&query, &pool, &StubOracle(None))
            .await
            .unwrap();

        // no exact matches and a failing oracle: the first five mentors
        // in pool order, all backfill
        assert_eq!(shortlist.len(), 5);
        let names: Vec<&str> = shortlist.iter().map(|r| r.mentor.name.as_str()).collect();
        assert_eq!(names, vec!["m0", "m1", "m2", "m3", "m4"]);
        assert!(shortlist
            .iter()
            .all(|r| r.tier == MatchTier::Backfill && r.score == BACKFILL_SCORE));
    }

    #[tokio::test]
    async fn test_oracle_picks_are_appended_after_exact() {
        let pool = vec![
            mentor("exact", Some("金融")),
            mentor("other1", Some("互联网")),
            mentor("other2", Some("法律")),
        ];
        let query = MatchQuery::new("金融", None);
        // candidate batch is [other1, other2]; pick other2 first
        let oracle = StubOracle(Some(
            r#"{"mentors": [{"index": 1, "score": 92, "reason": "行业相近"}]}"#.to_string(),
        ));

        let shortlist = Matcher::new()
            .select_mentors(&query, &pool, &oracle)
            .await
            .unwrap();

        assert_eq!(shortlist.len(), 3);
        assert_eq!(shortlist[0].mentor.name, "exact");
        assert_eq!(shortlist[0].tier, MatchTier::Exact);
        assert_eq!(shortlist[1].mentor.name, "other2");
        assert_eq!(shortlist[1].tier, MatchTier::Oracle);
        assert_eq!(shortlist[1].score, 92);
        assert_eq!(shortlist[1].reason, "行业相近");
        // pool exhausted after backfill adds the last mentor
        assert_eq!(shortlist[2].mentor.name, "other1");
        assert_eq!(shortlist[2].tier, MatchTier::Backfill);
    }

    #[tokio::test]
    async fn test_no_duplicate_names_across_tiers() {
        let pool = vec![
            mentor("a", Some("金融")),
            mentor("b", Some("互联网")),
            mentor("c", Some("互联网")),
        ];
        let query = MatchQuery::new("金融", None);
        // oracle repeats the same index twice
        let oracle = StubOracle(Some(
            r#"{"mentors": [{"index": 0, "score": 90}, {"index": 0, "score": 88}]}"#.to_string(),
        ));

        let shortlist = Matcher::new()
            .select_mentors(&query, &pool, &oracle)
            .await
            .unwrap();

        let mut names: Vec<&str> = shortlist.iter().map(|r| r.mentor.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), shortlist.len());
    }

    #[tokio::test]
    async fn test_small_pool_is_never_padded() {
        let pool = vec![mentor("a", Some("金融")), mentor("b", Some("金融"))];
        let query = MatchQuery::new("金融", None);

        let shortlist = Matcher::new()
            .select_mentors(&query, &pool, &StubOracle(None))
            .await
            .unwrap();

        assert_eq!(shortlist.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_pool_yields_empty_result() {
        let query = MatchQuery::new("金融", None);

        let shortlist = Matcher::new()
            .select_mentors(&query, &[], &StubOracle(None))
            .await
            .unwrap();

        assert!(shortlist.is_empty());
    }

    #[tokio::test]
    async fn test_idempotent_for_fixed_pool_and_oracle() {
        let pool: Vec<Mentor> = (0..8)
            .map(|i| mentor(&format!("m{}", i), Some(if i < 2 { "金融" } else { "互联网" })))
            .collect();
        let query = MatchQuery::new("金融", None);
        let oracle = StubOracle(Some(
            r#"{"mentors": [{"index": 3, "score": 77, "reason": "补充"}, {"index": 0, "score": 70}]}"#
                .to_string(),
        ));

        let matcher = Matcher::new();
        let first = matcher.select_mentors(&query, &pool, &oracle).await.unwrap();
        let second = matcher.select_mentors(&query, &pool, &oracle).await.unwrap();

        let names = |list: &[RankedMentor]| -> Vec<String> {
            list.iter().map(|r| r.mentor.name.clone()).collect()
        };
        assert_eq!(names(&first), names(&second));
        assert_eq!(first.len(), 5);
    }

    #[tokio::test]
    async fn test_finance_scenario_exhausts_small_pool() {
        // pool = A(金融/分析师/某银行), B(金融/顾问/某证券), C(互联网);
        // request (金融, 银行): exact = [A, B], oracle stubbed empty,
        // backfill adds C, pool exhausted at 3
        let pool = vec![
            Mentor {
                name: "A".to_string(),
                direction: Some("金融".to_string()),
                position: Some("分析师".to_string()),
                company: Some("某银行".to_string()),
                education: None,
                information: None,
                keywords: None,
            },
            Mentor {
                name: "B".to_string(),
                direction: Some("金融".to_string()),
                position: Some("顾问".to_string()),
                company: Some("某证券".to_string()),
                education: None,
                information: None,
                keywords: None,
            },
            mentor("C", Some("互联网")),
        ];
        let query = MatchQuery::new("金融", Some("银行".to_string()));
        let oracle = StubOracle(Some(r#"{"mentors": []}"#.to_string()));

        let shortlist = Matcher::new()
            .select_mentors(&query, &pool, &oracle)
            .await
            .unwrap();

        assert_eq!(shortlist.len(), 3);
        assert_eq!(shortlist[0].mentor.name, "A");
        assert_eq!(shortlist[0].tier, MatchTier::Exact);
        assert_eq!(shortlist[1].mentor.name, "B");
        assert_eq!(shortlist[1].tier, MatchTier::Exact);
        assert_eq!(shortlist[2].mentor.name, "C");
        assert_eq!(shortlist[2].tier, MatchTier::Backfill);
    }
}
