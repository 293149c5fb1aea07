//! Wire envelopes and payloads exchanged with the remote viewer.
//!
//! Every outbound message is an [`Envelope`]: a `type` discriminator, a
//! `data` payload, and the session's opaque `key` credential. The viewer
//! sends the same envelope shape back; the only inbound message this core
//! reacts to is the `stop` control command.
//!
//! A complete session on the wire is:
//!
//! ```text
//! metadata  {type:"simulation", start, end, length}        exactly once
//! data      {type:"simulation", timestamp, data:[actors]}  in file order
//! control   {type:"simulation", action:"closedown"}        exactly once, last
//! ```

use serde::{Deserialize, Serialize};

use crate::actor::ActorState;

/// Outbound message discriminator (the envelope's `type` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Run bounds and length, sent once before any data.
    Metadata,
    /// One snapshot's actor records (or a best-effort error payload).
    Data,
    /// Session control commands.
    Control,
}

/// The stream discriminator nested inside every payload.
///
/// Only simulation streams exist today; the tag keeps the payloads
/// forward-compatible with other stream kinds on the same connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamTag {
    /// An epidemic simulation replay stream.
    Simulation,
}

/// Control commands understood on a simulation stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    /// Viewer request to halt the replay mid-stream.
    Stop,
    /// Sender notice that the session is ending.
    Closedown,
}

/// A complete wire message: discriminator, payload, credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Message discriminator.
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// The payload, shaped per [`kind`](Self::kind).
    pub data: T,
    /// The session's opaque credential, attached to every message.
    pub key: String,
}

impl<T> Envelope<T> {
    /// Wrap a payload in an envelope carrying the session credential.
    pub fn new(kind: MessageKind, data: T, key: impl Into<String>) -> Self {
        Self {
            kind,
            data,
            key: key.into(),
        }
    }
}

/// Run bounds derived once per run from the snapshot sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Timestamp of the first snapshot, milliseconds since epoch.
    pub start: i64,
    /// Timestamp of the last snapshot, milliseconds since epoch.
    pub end: i64,
    /// Number of snapshots in the run.
    pub length: usize,
}

/// Payload of the one `metadata` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataPayload {
    /// Stream discriminator, always `simulation`.
    #[serde(rename = "type")]
    pub stream: StreamTag,
    /// Timestamp of the first snapshot, milliseconds since epoch.
    pub start: i64,
    /// Timestamp of the last snapshot, milliseconds since epoch.
    pub end: i64,
    /// Number of snapshots that will follow as data messages.
    pub length: usize,
}

impl From<SessionMetadata> for MetadataPayload {
    fn from(meta: SessionMetadata) -> Self {
        Self {
            stream: StreamTag::Simulation,
            start: meta.start,
            end: meta.end,
            length: meta.length,
        }
    }
}

/// Payload of one `data` message: a snapshot's actor records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPayload {
    /// Stream discriminator, always `simulation`.
    #[serde(rename = "type")]
    pub stream: StreamTag,
    /// The snapshot's timestamp, milliseconds since epoch.
    pub timestamp: i64,
    /// Actor records, in file order.
    pub data: Vec<ActorState>,
}

impl DataPayload {
    /// Build the payload for one snapshot instant.
    pub const fn new(timestamp: i64, data: Vec<ActorState>) -> Self {
        Self {
            stream: StreamTag::Simulation,
            timestamp,
            data,
        }
    }
}

/// Payload of a `control` message, in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPayload {
    /// Stream discriminator, always `simulation`.
    #[serde(rename = "type")]
    pub stream: StreamTag,
    /// The control command.
    pub action: ControlAction,
}

impl ControlPayload {
    /// Build a control payload for a simulation stream.
    pub const fn new(action: ControlAction) -> Self {
        Self {
            stream: StreamTag::Simulation,
            action,
        }
    }
}

/// Best-effort error notification, sent as a `data` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Human-readable description of what went wrong.
    pub error: String,
}

impl ErrorPayload {
    /// The notification sent when the run directory does not exist.
    pub fn missing_simulation_directory() -> Self {
        Self {
            error: "Missing simulation directory".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorId, HealthStatus};

    #[test]
    fn metadata_envelope_wire_shape() {
        let meta = SessionMetadata {
            start: 1_588_291_200_000,
            end: 1_588_291_800_000,
            length: 2,
        };
        let envelope = Envelope::new(
            MessageKind::Metadata,
            MetadataPayload::from(meta),
            "secret",
        );
        let json = serde_json::to_value(&envelope).unwrap_or_default();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "metadata",
                "data": {
                    "type": "simulation",
                    "start": 1_588_291_200_000_i64,
                    "end": 1_588_291_800_000_i64,
                    "length": 2
                },
                "key": "secret"
            })
        );
    }

    #[test]
    fn data_envelope_wire_shape() {
        let actors = vec![ActorState {
            id: ActorId::from(1),
            position: vec![1.5, 2.5],
            status: HealthStatus::INFECTED,
        }];
        let envelope = Envelope::new(
            MessageKind::Data,
            DataPayload::new(1_588_291_200_000, actors),
            "secret",
        );
        let json = serde_json::to_value(&envelope).unwrap_or_default();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "data",
                "data": {
                    "type": "simulation",
                    "timestamp": 1_588_291_200_000_i64,
                    "data": [{"id": 1, "position": [1.5, 2.5], "status": "I"}]
                },
                "key": "secret"
            })
        );
    }

    #[test]
    fn closedown_envelope_wire_shape() {
        let envelope = Envelope::new(
            MessageKind::Control,
            ControlPayload::new(ControlAction::Closedown),
            "secret",
        );
        let json = serde_json::to_value(&envelope).unwrap_or_default();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "control",
                "data": {"type": "simulation", "action": "closedown"},
                "key": "secret"
            })
        );
    }

    #[test]
    fn stop_control_parses_from_viewer_json() {
        let json = r#"{"type":"control","data":{"type":"simulation","action":"stop"},"key":"k"}"#;
        let envelope: Result<Envelope<ControlPayload>, _> = serde_json::from_str(json);
        assert_eq!(
            envelope.ok().map(|e| e.data.action),
            Some(ControlAction::Stop)
        );
    }

    #[test]
    fn error_payload_wire_shape() {
        let json = serde_json::to_value(ErrorPayload::missing_simulation_directory())
            .unwrap_or_default();
        assert_eq!(json, serde_json::json!({"error": "Missing simulation directory"}));
    }
}
