//! Error types for the replay worker.
//!
//! Uses `thiserror` for typed errors at the job boundary. Per-job
//! failures (connect, source, send) are reported to the scheduler as
//! failed outcomes, not as worker errors; this enum covers the worker's
//! own lifecycle.

/// Errors that can occur during worker operation.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// Failed to connect to or communicate with the NATS server.
    #[error("NATS error: {0}")]
    Nats(String),

    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),
}
