//! Error types for the replay engine.

use epistream_session::SessionError;
use epistream_source::SourceError;

/// Errors that abort a replay run.
///
/// A missing run directory is *not* among them: the engine recovers it
/// locally by notifying the viewer, and the run completes as far as the
/// scheduler is concerned.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The snapshot source failed: empty run, malformed filename, or
    /// malformed payload.
    #[error("snapshot source error: {0}")]
    Source(#[from] SourceError),

    /// The session transport failed mid-run.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// An outbound payload could not be serialized.
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}
