use crate::models::Mentor;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to match mentors against a career direction
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchMentorsRequest {
    #[validate(length(min = 1, message = "direction is required"))]
    pub direction: String,
    #[serde(default)]
    pub position: Option<String>,
}

/// Request to generate a case document for a chosen mentor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateCaseRequest {
    pub mentor: Mentor,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(alias = "customer_problems", rename = "customerProblems", default)]
    pub customer_problems: Vec<String>,
    #[serde(alias = "core_content", rename = "coreContent", default)]
    pub core_content: Option<String>,
    #[serde(default)]
    pub highlights: Option<String>,
}

/// Request to persist a case document, typically after manual editing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveCaseRequest {
    #[serde(alias = "case_id", rename = "caseId", default)]
    pub case_id: Option<String>,
    #[validate(length(min = 1, message = "case content is required"))]
    pub case: String,
    #[serde(default)]
    pub mentor: Option<Mentor>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(alias = "customer_problems", rename = "customerProblems", default)]
    pub customer_problems: Vec<String>,
    #[serde(alias = "core_content", rename = "coreContent", default)]
    pub core_content: Option<String>,
    #[serde(default)]
    pub highlights: Option<String>,
}
