// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{CaseRecord, MatchQuery, MatchTier, Mentor, RankedEntry, RankedMentor};
pub use requests::{GenerateCaseRequest, MatchMentorsRequest, SaveCaseRequest};
pub use responses::{
    CaseDetailResponse, CaseListResponse, CaseResponse, CaseSummary, ErrorResponse,
    HealthResponse, MatchMentorsResponse, MentorsResponse,
};
