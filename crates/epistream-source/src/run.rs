//! Run directory enumeration.
//!
//! A run directory's name starts with a grouping key shared by all of
//! its snapshot files (`actors_2020_05_01_500_city` groups files whose
//! stems start with `actors_2020_05_01`). Enumeration keeps entries with
//! the `.geojson` extension and that key prefix, sorted by filename --
//! which is chronological order because the filenames embed a
//! fixed-width timestamp.

use std::fs;
use std::path::{Path, PathBuf};

use epistream_types::SessionMetadata;
use tracing::info;

use crate::error::SourceError;
use crate::snapshot::SnapshotFile;

/// Number of leading underscore-separated directory-name components that
/// form the grouping key shared with snapshot filenames.
const GROUP_KEY_COMPONENTS: usize = 4;

/// Recognized snapshot file extension.
const SNAPSHOT_EXTENSION: &str = "geojson";

/// An opened simulation run: a named, immutable, time-ordered sequence
/// of snapshot files.
#[derive(Debug, Clone)]
pub struct SimulationRun {
    name: String,
    snapshots: Vec<SnapshotFile>,
}

impl SimulationRun {
    /// Open a run directory and enumerate its snapshot sequence.
    ///
    /// Zero matching files is a valid (empty) run, not an error; the
    /// error surfaces later when [`metadata`](Self::metadata) finds no
    /// bounds to derive.
    ///
    /// # Errors
    ///
    /// [`SourceError::MissingRun`] when `dir` does not exist or is not a
    /// directory; [`SourceError::MalformedName`] when a matching file's
    /// timestamp cannot be parsed.
    pub fn open(dir: &Path) -> Result<Self, SourceError> {
        if !dir.is_dir() {
            return Err(SourceError::MissingRun(dir.to_path_buf()));
        }

        let name = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let key = group_key(&name);

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_snapshot = path
                .extension()
                .is_some_and(|ext| ext == SNAPSHOT_EXTENSION)
                && path
                    .file_stem()
                    .is_some_and(|stem| stem.to_string_lossy().starts_with(&key));
            if is_snapshot {
                paths.push(path);
            }
        }
        paths.sort();

        let mut snapshots = Vec::with_capacity(paths.len());
        for path in paths {
            snapshots.push(SnapshotFile::open(path)?);
        }

        info!(run = %name, snapshots = snapshots.len(), "simulation run opened");
        Ok(Self { name, snapshots })
    }

    /// The run directory name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The snapshot sequence, in chronological file order.
    pub fn snapshots(&self) -> &[SnapshotFile] {
        &self.snapshots
    }

    /// Number of snapshots in the run.
    pub const fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the run matched no snapshot files.
    pub const fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Derive the run bounds sent once as the metadata message.
    ///
    /// # Errors
    ///
    /// [`SourceError::EmptyRun`] when the run has no snapshots; an empty
    /// run has no bounds, and a zero-length metadata message is never
    /// sent.
    pub fn metadata(&self) -> Result<SessionMetadata, SourceError> {
        let first = self.snapshots.first().ok_or(SourceError::EmptyRun)?;
        let last = self.snapshots.last().ok_or(SourceError::EmptyRun)?;
        Ok(SessionMetadata {
            start: first.timestamp(),
            end: last.timestamp(),
            length: self.snapshots.len(),
        })
    }
}

/// The grouping key shared by a run directory and its snapshot files:
/// the first [`GROUP_KEY_COMPONENTS`] underscore-separated components of
/// the directory name.
fn group_key(dir_name: &str) -> String {
    dir_name
        .split('_')
        .take(GROUP_KEY_COMPONENTS)
        .collect::<Vec<_>>()
        .join("_")
}
