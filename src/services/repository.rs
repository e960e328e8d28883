use crate::models::Mentor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors that can occur when loading the mentor pool
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Failed to read mentor file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse mentor file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read-only mentor pool backed by a JSON file.
///
/// The pool is loaded once at startup and refreshable on demand; a
/// reload replaces the snapshot atomically, so a request that already
/// took a snapshot keeps matching against the pool it started with.
pub struct MentorRepository {
    path: PathBuf,
    mentors: RwLock<Arc<Vec<Mentor>>>,
}

impl MentorRepository {
    /// Open the repository and attempt an initial load.
    ///
    /// A load failure degrades to an empty pool: matching still runs and
    /// simply yields fewer candidates.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mentors = match load_mentors(&path) {
            Ok(mentors) => {
                tracing::info!("Loaded {} mentors from {}", mentors.len(), path.display());
                mentors
            }
            Err(e) => {
                tracing::error!("{}; starting with an empty mentor pool", e);
                Vec::new()
            }
        };

        Self {
            path,
            mentors: RwLock::new(Arc::new(mentors)),
        }
    }

    /// Current pool snapshot. Cheap to clone and immutable for the
    /// lifetime of a request.
    pub fn snapshot(&self) -> Arc<Vec<Mentor>> {
        self.mentors.read().expect("mentor pool lock poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-read the mentor file and swap in the new snapshot.
    pub fn reload(&self) -> Result<usize, RepositoryError> {
        let mentors = load_mentors(&self.path)?;
        let count = mentors.len();
        *self.mentors.write().expect("mentor pool lock poisoned") = Arc::new(mentors);
        tracing::info!("Reloaded {} mentors from {}", count, self.path.display());
        Ok(count)
    }
}

fn load_mentors(path: &Path) -> Result<Vec<Mentor>, RepositoryError> {
    let content = std::fs::read_to_string(path).map_err(|source| RepositoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| RepositoryError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_pool(file: &mut tempfile::NamedTempFile, json: &str) {
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();
    }

    #[test]
    fn test_open_loads_mentors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write_pool(
            &mut file,
            r#"[{"name": "张老师", "direction": "金融"}, {"name": "李老师"}]"#,
        );

        let repo = MentorRepository::open(file.path());
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.snapshot()[0].name, "张老师");
    }

    #[test]
    fn test_open_missing_file_degrades_to_empty_pool() {
        let repo = MentorRepository::open("/nonexistent/mentors.json");
        assert!(repo.is_empty());
    }

    #[test]
    fn test_open_malformed_file_degrades_to_empty_pool() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write_pool(&mut file, "not json");

        let repo = MentorRepository::open(file.path());
        assert!(repo.is_empty());
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write_pool(&mut file, r#"[{"name": "张老师"}]"#);

        let repo = MentorRepository::open(file.path());
        let before = repo.snapshot();

        std::fs::write(file.path(), r#"[{"name": "张老师"}, {"name": "李老师"}]"#).unwrap();
        let count = repo.reload().unwrap();

        assert_eq!(count, 2);
        assert_eq!(repo.len(), 2);
        // the old snapshot is unaffected by the reload
        assert_eq!(before.len(), 1);
    }

    #[test]
    fn test_reload_failure_keeps_previous_pool() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write_pool(&mut file, r#"[{"name": "张老师"}]"#);

        let repo = MentorRepository::open(file.path());
        std::fs::write(file.path(), "broken").unwrap();

        assert!(repo.reload().is_err());
        assert_eq!(repo.len(), 1);
    }
}
