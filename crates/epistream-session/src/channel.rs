//! The polymorphic seam between the replay engine and the transport.

use epistream_types::MessageKind;
use serde_json::Value;

use crate::error::SessionError;

/// Capability set the replay engine needs from a session transport.
///
/// Payloads cross the seam as [`serde_json::Value`] so engine tests can
/// record exactly what would go on the wire without a live connection.
///
/// Termination consumes the channel, so a session can only be closed
/// once and never used after closing.
pub trait ReplayChannel {
    /// Serialize `{type, data, key}` and deliver it as one message,
    /// waiting for the outbound buffer to flush before returning.
    fn send(
        &mut self,
        kind: MessageKind,
        payload: Value,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Non-blocking read of the cancellation flag set by the viewer's
    /// `stop` control message.
    fn is_stopped(&self) -> bool;

    /// Orderly closedown: send the final `closedown` control message,
    /// then drain the receive side and close the connection.
    fn close(self) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Close the connection without the closedown control message.
    /// Used when the run never started (the peer got an error payload
    /// instead of metadata).
    fn disconnect(self) -> impl Future<Output = Result<(), SessionError>> + Send;
}
