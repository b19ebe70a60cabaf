use crate::models::MatchResults;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Bumped whenever the on-disk layout changes
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Errors that can occur while persisting or restoring results
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("Unsupported snapshot format version {found} (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },
}

/// Results of one batch run as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub format_version: u32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub results: MatchResults,
}

impl Snapshot {
    pub fn new(results: MatchResults) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            created_at: chrono::Utc::now(),
            results,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = bincode::deserialize(bytes)?;
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                found: snapshot.format_version,
                expected: SNAPSHOT_FORMAT_VERSION,
            });
        }
        Ok(snapshot)
    }
}

/// Write results to `path`, replacing any previous snapshot atomically
pub fn save_snapshot<P: AsRef<Path>>(path: P, results: &MatchResults) -> Result<Snapshot, SnapshotError> {
    let path = path.as_ref();
    let snapshot = Snapshot::new(results.clone());
    let bytes = snapshot.to_bytes()?;

    let io_err = |source: std::io::Error| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(&bytes))
        .map_err(|e| io_err(e.into()))?;

    tracing::info!(
        "Saved snapshot with {} pairs for {} people to {} ({} bytes)",
        results.matches.len(),
        results.people_count(),
        path.display(),
        bytes.len()
    );
    Ok(snapshot)
}

/// Read a snapshot written by [`save_snapshot`]
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Snapshot, SnapshotError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let snapshot = Snapshot::from_bytes(&bytes)?;
    tracing::info!(
        "Loaded snapshot from {} created at {}",
        path.display(),
        snapshot.created_at
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PairScore, PersonTable};

    fn sample_results() -> MatchResults {
        let pair = PairScore {
            person1: "Ava".to_string(),
            person2: "Ben".to_string(),
            score: 0.85,
        };
        MatchResults {
            matches: vec![pair.clone()],
            individual_tables: vec![
                PersonTable {
                    name: "Ava".to_string(),
                    matches: vec![pair.clone()],
                },
                PersonTable {
                    name: "Ben".to_string(),
                    matches: vec![pair],
                },
            ],
        }
    }

    #[test]
    fn test_save_and_load_reproduce_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("roommate_results.bin");

        let saved = save_snapshot(&path, &sample_results()).unwrap();
        let loaded = load_snapshot(&path).unwrap();

        assert_eq!(loaded, saved);
        assert_eq!(loaded.results, sample_results());
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roommate_results.bin");

        save_snapshot(&path, &sample_results()).unwrap();
        save_snapshot(&path, &MatchResults::default()).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert!(loaded.results.matches.is_empty());
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let mut snapshot = Snapshot::new(sample_results());
        snapshot.format_version = SNAPSHOT_FORMAT_VERSION + 1;
        let bytes = bincode::serialize(&snapshot).unwrap();

        let err = Snapshot::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, SnapshotError::VersionMismatch { .. }));
    }

    #[test]
    fn test_load_missing_snapshot() {
        let err = load_snapshot("/nonexistent/roommate_results.bin").unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
    }
}
