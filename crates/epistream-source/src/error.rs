//! Error types for the snapshot source.
//!
//! Uses `thiserror` for typed errors. A missing run directory is the one
//! failure the engine recovers from (it notifies the peer); everything
//! else aborts the run.

use std::path::PathBuf;

/// Errors that can occur while enumerating or reading a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The run directory does not exist or is not a directory.
    #[error("missing simulation directory: {}", .0.display())]
    MissingRun(PathBuf),

    /// A snapshot filename does not carry a parseable timestamp.
    #[error("malformed snapshot filename {name}: {reason}")]
    MalformedName {
        /// The offending filename.
        name: String,
        /// What failed to parse.
        reason: String,
    },

    /// A snapshot payload is not the expected feature collection shape.
    #[error("invalid snapshot payload in {name}: {reason}")]
    Format {
        /// The offending filename.
        name: String,
        /// What was wrong with the payload.
        reason: String,
    },

    /// The run directory matched no snapshot files, so there are no
    /// bounds to derive metadata from.
    #[error("simulation run contains no snapshot files")]
    EmptyRun,

    /// An underlying filesystem read failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
