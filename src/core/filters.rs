use crate::models::{MatchQuery, MatchTier, Mentor, RankedMentor};

/// Delimiters accepted in a mentor's direction list, full-width and
/// half-width comma plus slash.
const DIRECTION_DELIMITERS: [char; 4] = ['、', '，', ',', '/'];

/// Score assigned to every exact-tier candidate.
pub const EXACT_SCORE: u8 = 100;
pub const EXACT_REASON: &str = "direction and role fully satisfy the request";

/// A category-inference family: when the requested role contains one of
/// the request keywords, a mentor employed at a company containing any of
/// the synonyms is considered compatible. New families are additive.
pub struct CategoryFamily {
    pub request_keywords: &'static [&'static str],
    pub employer_synonyms: &'static [&'static str],
}

pub const CATEGORY_FAMILIES: &[CategoryFamily] = &[
    CategoryFamily {
        request_keywords: &["互联网"],
        employer_synonyms: &["互联网", "科技", "软件"],
    },
    CategoryFamily {
        request_keywords: &["金融", "银行", "证券"],
        employer_synonyms: &["金融", "银行", "证券"],
    },
    CategoryFamily {
        request_keywords: &["快消"],
        employer_synonyms: &["快消", "消费"],
    },
];

/// Check whether a mentor's declared specialty covers the requested
/// direction.
///
/// The mentor string is split on the accepted delimiters and each trimmed
/// sub-specialty is compared by substring containment in either
/// direction. The containment is deliberately permissive to favor recall;
/// short direction strings can match broadly.
#[inline]
pub fn matches_direction(mentor: &Mentor, requested: &str) -> bool {
    let Some(direction) = mentor.direction.as_deref() else {
        return false;
    };

    direction
        .split(DIRECTION_DELIMITERS)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .any(|d| d.contains(requested) || requested.contains(d))
}

/// Check whether a mentor's role and employer are compatible with the
/// requested target role.
///
/// Direct containment on the role title is tried first, then the
/// category families against the employer. An unspecified mentor role is
/// never a match failure.
#[inline]
pub fn matches_position(mentor: &Mentor, requested: &str) -> bool {
    let requested = requested.trim().to_lowercase();
    let position = mentor
        .position
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    let company = mentor.company.as_deref().unwrap_or_default().to_lowercase();

    if position.contains(&requested) || requested.contains(&position) {
        return true;
    }

    CATEGORY_FAMILIES.iter().any(|family| {
        family.request_keywords.iter().any(|k| requested.contains(k))
            && family.employer_synonyms.iter().any(|s| company.contains(s))
    })
}

/// Exact-tier predicate: direction must match, and the role must match
/// whenever one was requested.
#[inline]
pub fn matches_request(mentor: &Mentor, query: &MatchQuery) -> bool {
    if !matches_direction(mentor, &query.direction) {
        return false;
    }

    match query.position.as_deref() {
        Some(position) => matches_position(mentor, position),
        None => true,
    }
}

/// Run the exact tier over the full pool, preserving pool order.
pub fn select_exact(pool: &[Mentor], query: &MatchQuery) -> Vec<RankedMentor> {
    pool.iter()
        .filter(|mentor| matches_request(mentor, query))
        .map(|mentor| {
            RankedMentor::new(mentor.clone(), MatchTier::Exact, EXACT_SCORE, EXACT_REASON)
        })
        .collect()
}
