//! File-backed snapshot store.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use fc3d_core::{DrawResult, LatestView, Snapshot};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::info;

use crate::StoreError;

pub const DEFAULT_DIR: &str = "data";
pub const DEFAULT_SNAPSHOT_FILE: &str = "lottery_data.json";
pub const DEFAULT_LATEST_FILE: &str = "latest.json";

/// Locations of the two persisted documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub snapshot_path: PathBuf,
    pub latest_path: PathBuf,
}

impl StoreConfig {
    /// Both documents inside `dir` under the given file names.
    pub fn in_dir(dir: impl AsRef<Path>, snapshot_file: &str, latest_file: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            snapshot_path: dir.join(snapshot_file),
            latest_path: dir.join(latest_file),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DIR, DEFAULT_SNAPSHOT_FILE, DEFAULT_LATEST_FILE)
    }
}

/// What a [`SnapshotStore::persist`] call wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistSummary {
    pub total: usize,
    pub latest_written: bool,
}

/// Persists the snapshot and latest-record documents as pretty-printed JSON.
///
/// Every write replaces the whole document: content goes to a temporary file
/// in the target directory, which is then renamed over the target. A reader
/// sees either the previous document or the new one, never a partial write.
pub struct SnapshotStore {
    config: StoreConfig,
}

impl SnapshotStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Write `results` (newest first) as the snapshot, and its first record
    /// as the latest view. With no results only the snapshot is written and
    /// any previous latest view is left as it was.
    pub fn persist(
        &self,
        results: &[DrawResult],
        generated_at: NaiveDateTime,
    ) -> Result<PersistSummary, StoreError> {
        let snapshot = Snapshot::new(results.to_vec(), generated_at);
        write_json(&self.config.snapshot_path, &snapshot)?;
        info!(
            path = %self.config.snapshot_path.display(),
            total = snapshot.total,
            "wrote snapshot"
        );

        let latest_written = match snapshot.latest() {
            Some(newest) => {
                let view = LatestView::new(newest.clone(), generated_at);
                write_json(&self.config.latest_path, &view)?;
                info!(
                    path = %self.config.latest_path.display(),
                    period = %newest.period(),
                    "wrote latest view"
                );
                true
            }
            None => false,
        };

        Ok(PersistSummary {
            total: snapshot.total,
            latest_written,
        })
    }

    pub fn load_snapshot(&self) -> Result<Snapshot, StoreError> {
        read_json(&self.config.snapshot_path)
    }

    pub fn load_latest(&self) -> Result<LatestView, StoreError> {
        read_json(&self.config.latest_path)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err)?;

    let tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, value).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        writer.write_all(b"\n").map_err(io_err)?;
        writer.flush().map_err(io_err)?;
    }
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}
