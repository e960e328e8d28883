use crate::models::domain::{CaseRecord, Mentor, RankedMentor};
use serde::{Deserialize, Serialize};

/// Response for the mentor listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorsResponse {
    pub mentors: Vec<Mentor>,
    pub count: usize,
}

/// Response for the match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchMentorsResponse {
    pub mentors: Vec<RankedMentor>,
    pub count: usize,
}

/// Response for case generation and save
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResponse {
    pub case: String,
    #[serde(rename = "caseId")]
    pub case_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Summary entry in the case history listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSummary {
    pub id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub mentor: String,
    pub direction: String,
    pub preview: String,
}

/// Response for the case history listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseListResponse {
    pub cases: Vec<CaseSummary>,
    pub count: usize,
}

/// Response for a single case lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDetailResponse {
    pub case: CaseRecord,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(rename = "mentorCount")]
    pub mentor_count: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
