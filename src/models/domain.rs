use serde::{Deserialize, Serialize};

/// A mentor record as stored in the mentor pool file.
///
/// `name` is the de-duplication key and the only required field. Every
/// other field may be absent and is treated as "unspecified" by the
/// matching rules, never as a match failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mentor {
    pub name: String,
    /// Delimited list of sub-specialties, e.g. "金融、投资/咨询".
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    /// Free-text biography.
    #[serde(default)]
    pub information: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
}

/// Which stage of the selection cascade produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Exact,
    Oracle,
    Backfill,
}

/// A mentor selected for the shortlist, tagged with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMentor {
    #[serde(flatten)]
    pub mentor: Mentor,
    #[serde(rename = "matchTier")]
    pub tier: MatchTier,
    #[serde(rename = "matchScore")]
    pub score: u8,
    #[serde(rename = "matchReason")]
    pub reason: String,
}

impl RankedMentor {
    pub fn new(mentor: Mentor, tier: MatchTier, score: u8, reason: impl Into<String>) -> Self {
        Self {
            mentor,
            tier,
            score,
            reason: reason.into(),
        }
    }
}

/// A single match request, constructed per call.
#[derive(Debug, Clone)]
pub struct MatchQuery {
    pub direction: String,
    pub position: Option<String>,
}

impl MatchQuery {
    pub fn new(direction: impl Into<String>, position: Option<String>) -> Self {
        // A blank position means "not requested".
        let position = position.filter(|p| !p.trim().is_empty());
        Self {
            direction: direction.into(),
            position,
        }
    }
}

/// One entry of the relevance oracle's ranked response.
///
/// The index addresses the candidate batch by position, not by mentor
/// name; out-of-range indices are discarded by the ranker. Score and
/// reason may be omitted by the oracle and carry defaults downstream.
#[derive(Debug, Clone, Deserialize)]
pub struct RankedEntry {
    pub index: i64,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A persisted case document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub mentor: Mentor,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub position: String,
    #[serde(rename = "customerProblems", default)]
    pub customer_problems: Vec<String>,
    #[serde(rename = "coreContent", default)]
    pub core_content: String,
    #[serde(default)]
    pub highlights: String,
    #[serde(rename = "languageStyle", default)]
    pub language_style: String,
    pub case: String,
}
