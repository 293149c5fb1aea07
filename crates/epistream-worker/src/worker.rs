//! The replay worker: job intake, session execution, acknowledgement.
//!
//! The scheduler owns queuing, retry, and result storage; this worker
//! only turns each submitted job into one complete replay session. The
//! job body runs to completion (success or failure) before the next
//! message is taken, and any engine failure is translated into a failed
//! outcome rather than a worker crash. Cancellation is never decided
//! here -- it arrives over the already-open session as the viewer's
//! stop command.

use std::path::{Path, PathBuf};

use epistream_engine::ReplayEngine;
use epistream_session::WsChannel;
use epistream_types::{ReplayOutcome, ReplayParams, ReplayRequest, RunStatus, SessionId};
use futures::StreamExt;
use tracing::{info, warn};

use crate::error::WorkerError;

/// NATS-driven replay worker.
pub struct ReplayWorker {
    client: async_nats::Client,
    subject: String,
    data_dir: PathBuf,
}

impl ReplayWorker {
    /// Create a worker bound to a job subject and a data directory.
    pub const fn new(client: async_nats::Client, subject: String, data_dir: PathBuf) -> Self {
        Self {
            client,
            subject,
            data_dir,
        }
    }

    /// Run the job loop.
    ///
    /// Subscribes to the job subject and processes each submission to
    /// completion, one at a time. Runs until the NATS connection drops.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Nats`] if the subscription fails.
    pub async fn run(&self) -> Result<(), WorkerError> {
        let mut subscriber = self
            .client
            .subscribe(self.subject.clone())
            .await
            .map_err(|e| WorkerError::Nats(format!("failed to subscribe to {}: {e}", self.subject)))?;
        info!(subject = self.subject, "replay worker started, awaiting job submissions");

        while let Some(message) = subscriber.next().await {
            self.handle(message).await;
        }

        info!("NATS subscription ended, worker shutting down");
        Ok(())
    }

    /// Process one job submission.
    ///
    /// Malformed requests are logged and skipped -- retrying them is
    /// the scheduler's call, and a request that does not decode will
    /// never succeed anyway.
    async fn handle(&self, message: async_nats::Message) {
        let request: ReplayRequest = match serde_json::from_slice(&message.payload) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "failed to deserialize replay request, skipping");
                return;
            }
        };

        let session = SessionId::new();
        info!(
            session = %session,
            endpoint = request.endpoint,
            simulation = ?request.params.simulation,
            "replay job accepted"
        );

        let outcome = self.execute(session, &request).await;
        match outcome.status {
            RunStatus::Completed => info!(session = %session, "replay job completed"),
            RunStatus::Failed => warn!(
                session = %session,
                error = ?outcome.error,
                "replay job failed"
            ),
        }

        // Request/reply acknowledgement, when the scheduler asked for one.
        if let Some(reply) = message.reply {
            match serde_json::to_vec(&outcome) {
                Ok(payload) => {
                    if let Err(e) = self.client.publish(reply, payload.into()).await {
                        warn!(session = %session, error = %e, "failed to publish job outcome");
                    }
                }
                Err(e) => {
                    warn!(session = %session, error = %e, "failed to serialize job outcome");
                }
            }
        }
    }

    /// Run one replay session to its terminal outcome.
    async fn execute(&self, session: SessionId, request: &ReplayRequest) -> ReplayOutcome {
        let run_dir = run_directory(&self.data_dir, &request.params);

        let channel = match WsChannel::connect(&request.endpoint, &request.key).await {
            Ok(channel) => channel,
            Err(e) => {
                warn!(session = %session, error = %e, "session connect failed");
                return ReplayOutcome::failed(session, e.to_string());
            }
        };

        match ReplayEngine::new(session).run(channel, &run_dir).await {
            Ok(()) => ReplayOutcome::completed(session),
            Err(e) => ReplayOutcome::failed(session, e.to_string()),
        }
    }
}

/// Resolve the run directory for a job: a named run under the data
/// directory, or the data directory itself when the job names none.
fn run_directory(data_dir: &Path, params: &ReplayParams) -> PathBuf {
    params
        .simulation
        .as_ref()
        .map_or_else(|| data_dir.to_path_buf(), |name| data_dir.join(name))
}
