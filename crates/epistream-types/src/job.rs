//! Request and outcome types for the job dispatch boundary.
//!
//! The scheduler submits replay jobs as JSON messages; the worker decodes
//! them into [`ReplayRequest`], runs the session to completion, and
//! acknowledges with a [`ReplayOutcome`] on the reply subject. Queuing,
//! retry, and result storage all belong to the scheduler side.

use serde::{Deserialize, Serialize};

use crate::ids::SessionId;

/// A replay job as submitted by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayRequest {
    /// Viewer endpoint to connect to (a `ws://` or `wss://` URL).
    pub endpoint: String,
    /// Opaque credential forwarded on every outbound message.
    pub key: String,
    /// Free-form run parameters.
    #[serde(default)]
    pub params: ReplayParams,
}

/// Free-form parameters of a replay job.
///
/// Unknown fields are ignored so schedulers can carry extra bookkeeping
/// without breaking the worker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayParams {
    /// Run directory name under the worker's configured data directory.
    /// When absent, the data directory itself is the run directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation: Option<String>,
}

/// Terminal status of a replay job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// The full ordered sequence was sent, or the viewer stopped the
    /// replay cleanly.
    Completed,
    /// The run aborted; `error` carries the reason.
    Failed,
}

/// The worker's acknowledgement of a replay job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    /// The session identifier minted for this run.
    pub session: SessionId,
    /// Terminal status.
    pub status: RunStatus,
    /// Failure reason, present only when `status` is `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReplayOutcome {
    /// A successful completion acknowledgement.
    pub const fn completed(session: SessionId) -> Self {
        Self {
            session,
            status: RunStatus::Completed,
            error: None,
        }
    }

    /// A failure acknowledgement carrying the error description.
    pub fn failed(session: SessionId, error: impl Into<String>) -> Self {
        Self {
            session,
            status: RunStatus::Failed,
            error: Some(error.into()),
        }
    }
}
