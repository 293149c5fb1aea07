//! Error types for the session channel.

/// Errors that can occur over the life of a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The handshake failed or the endpoint was unreachable. Fatal for
    /// the session; retry policy, if any, belongs to the invocation
    /// adapter.
    #[error("connect failed: {0}")]
    Connect(String),

    /// The connection dropped while sending. Fatal; aborts the
    /// remaining replay iterations.
    #[error("send failed: {0}")]
    Send(String),

    /// An outbound payload could not be serialized.
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// The background receive task ended abnormally during drain.
    #[error("receive task failed: {0}")]
    Drain(String),
}
