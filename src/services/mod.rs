// Service exports
pub mod archive;
pub mod oracle;
pub mod repository;

pub use archive::{ArchiveError, CaseArchive};
pub use oracle::{DashScopeClient, OracleError, RelevanceOracle};
pub use repository::{MentorRepository, RepositoryError};
