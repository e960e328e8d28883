use crate::models::{CaseRecord, CaseSummary};
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Length of the preview text in case summaries, in characters.
const PREVIEW_CHARS: usize = 100;

/// Errors that can occur when persisting or reading case documents
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Case not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// On-disk case archive: one JSON document per generated case, keyed by
/// UUID. Identifiers are parsed before any path is built, so a lookup
/// can never escape the archive directory.
pub struct CaseArchive {
    dir: PathBuf,
}

impl CaseArchive {
    /// Open the archive, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn case_path(&self, id: &Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn parse_id(id: &str) -> Result<Uuid, ArchiveError> {
        Uuid::parse_str(id).map_err(|_| ArchiveError::NotFound(id.to_string()))
    }

    pub fn save(&self, record: &CaseRecord) -> Result<(), ArchiveError> {
        let id = Self::parse_id(&record.id)?;
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(self.case_path(&id), json)?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<CaseRecord, ArchiveError> {
        let uuid = Self::parse_id(id)?;
        let path = self.case_path(&uuid);
        if !path.exists() {
            return Err(ArchiveError::NotFound(id.to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let record = serde_json::from_str(&content)?;
        Ok(record)
    }

    pub fn delete(&self, id: &str) -> Result<(), ArchiveError> {
        let uuid = Self::parse_id(id)?;
        let path = self.case_path(&uuid);
        if !path.exists() {
            return Err(ArchiveError::NotFound(id.to_string()));
        }
        std::fs::remove_file(path)?;
        Ok(())
    }

    /// List case summaries, newest first. Malformed files are skipped
    /// with a warning rather than failing the whole listing.
    pub fn list(&self) -> Result<Vec<CaseSummary>, ArchiveError> {
        let mut summaries = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let record: CaseRecord = match std::fs::read_to_string(&path)
                .map_err(ArchiveError::from)
                .and_then(|content| serde_json::from_str(&content).map_err(ArchiveError::from))
            {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("Skipping unreadable case file {}: {}", path.display(), e);
                    continue;
                }
            };

            summaries.push(summarize(&record));
        }

        summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(summaries)
    }
}

fn summarize(record: &CaseRecord) -> CaseSummary {
    let mut preview: String = record.case.chars().take(PREVIEW_CHARS).collect();
    if record.case.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }

    CaseSummary {
        id: record.id.clone(),
        timestamp: record.timestamp,
        mentor: record.mentor.name.clone(),
        direction: record.direction.clone(),
        preview,
    }
}
