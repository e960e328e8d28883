use crate::models::{MatchQuery, MatchTier, Mentor, RankedEntry, RankedMentor};
use crate::services::RelevanceOracle;
use serde::Deserialize;
use std::fmt::Write;
use tracing::warn;

/// Reason attached to an oracle pick whose justification came back empty.
pub const DEFAULT_ORACLE_REASON: &str = "recommended by relevance analysis";

/// Placeholder rendered into the rubric for unspecified mentor fields.
const UNSPECIFIED: &str = "未提供";

#[derive(Debug, Deserialize)]
struct RankingPayload {
    mentors: Vec<RankedEntry>,
}

/// Ask the relevance oracle to rank the candidate batch and resolve its
/// answer back into concrete mentors.
///
/// Every failure mode of the oracle — transport error, non-success
/// status, unparsable or structurally wrong payload — is soft: it is
/// logged and an empty result is returned so the caller falls through to
/// backfill. The request itself never fails here.
pub async fn rank_candidates<O>(
    oracle: &O,
    query: &MatchQuery,
    candidates: &[&Mentor],
    remaining: usize,
) -> Vec<RankedMentor>
where
    O: RelevanceOracle + ?Sized,
{
    if candidates.is_empty() || remaining == 0 {
        return Vec::new();
    }

    let rubric = build_rubric(query, candidates, remaining);

    let text = match oracle.complete(&rubric).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Relevance oracle call failed, falling back: {}", e);
            return Vec::new();
        }
    };

    match parse_ranking(&text) {
        Some(entries) => resolve_entries(entries, candidates, remaining),
        None => Vec::new(),
    }
}

/// Build the natural-language rubric: the request, then every candidate
/// enumerated by zero-based batch index with all of its fields,
/// unspecified ones included explicitly.
pub fn build_rubric(query: &MatchQuery, candidates: &[&Mentor], remaining: usize) -> String {
    let mut rubric = format!(
        "请根据以下求职需求，从候选导师中筛选出最适合的{}位导师，并按照匹配度从高到低排序。\n\n\
         求职方向：{}\n求职岗位：{}\n\n候选导师信息：\n",
        remaining,
        query.direction,
        query.position.as_deref().unwrap_or("未指定"),
    );

    for (index, mentor) in candidates.iter().enumerate() {
        let _ = write!(
            rubric,
            "导师{}：\n- 姓名：{}\n- 公司：{}\n- 职位：{}\n- 擅长方向：{}\n- 教育背景：{}\n- 详细介绍：{}\n- 关键词：{}\n\n",
            index,
            mentor.name,
            field_or_unspecified(&mentor.company),
            field_or_unspecified(&mentor.position),
            field_or_unspecified(&mentor.direction),
            field_or_unspecified(&mentor.education),
            field_or_unspecified(&mentor.information),
            field_or_unspecified(&mentor.keywords),
        );
    }

    let _ = write!(
        rubric,
        "请分析每位导师的专业背景、工作经历、擅长领域与求职需求的匹配度，筛选出最适合的{}位导师。\n\n\
         请严格按照以下JSON格式返回结果，只返回JSON，不要有其他文字：\n\
         {{\n  \"mentors\": [\n    {{\"index\": 候选导师编号（从0开始，对应候选导师列表）, \
         \"score\": 匹配度分数（1-100，分数越高匹配度越高）, \"reason\": \"匹配理由\"}}\n  ]\n}}\n\n\
         只返回最适合的{}位导师，按匹配度从高到低排序。",
        remaining, remaining,
    );

    rubric
}

fn field_or_unspecified(value: &Option<String>) -> &str {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(UNSPECIFIED)
}

/// Strip a surrounding markdown code fence, with or without a `json`
/// language tag, before structural parsing.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest).trim_start();
    rest.strip_suffix("```").map(str::trim_end).unwrap_or(rest)
}

/// Parse the oracle's text into ranked entries. Any structural problem
/// yields `None` and a warning; the caller treats that as a soft failure.
fn parse_ranking(text: &str) -> Option<Vec<RankedEntry>> {
    let payload = strip_code_fences(text);
    match serde_json::from_str::<RankingPayload>(payload) {
        Ok(ranking) => Some(ranking.mentors),
        Err(e) => {
            warn!(
                "Relevance oracle returned an unusable ranking: {} (payload: {:.200})",
                e, payload
            );
            None
        }
    }
}

/// Map batch indices back to concrete mentors. Indices outside
/// `[0, batch size)` are dropped; the result is truncated to the
/// outstanding slot count.
pub fn resolve_entries(
    entries: Vec<RankedEntry>,
    candidates: &[&Mentor],
    remaining: usize,
) -> Vec<RankedMentor> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let index = usize::try_from(entry.index).ok()?;
            let mentor = candidates.get(index)?;
            let score = entry.score.unwrap_or(0).clamp(0, 100) as u8;
            let reason = entry
                .reason
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ORACLE_REASON.to_string());
            Some(RankedMentor::new(
                (*mentor).clone(),
                MatchTier::Oracle,
                score,
                reason,
            ))
        })
        .take(remaining)
        .collect()
}
