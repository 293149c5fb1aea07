//! The replay state machine: metadata once, data in order, closedown last.

use std::path::Path;

use epistream_session::ReplayChannel;
use epistream_source::{SimulationRun, SourceError};
use epistream_types::{DataPayload, ErrorPayload, MessageKind, MetadataPayload, SessionId};
use tracing::{debug, info, warn};

use crate::error::EngineError;

/// Drives one replay session over an already-connected channel.
///
/// The engine owns no connection state itself; it consumes the channel
/// and releases it on every terminal path. A completed run closes the
/// session in order; a failed run disconnects without a closedown, so
/// the viewer observes the connection ending rather than a silently
/// hung session.
#[derive(Debug, Clone, Copy)]
pub struct ReplayEngine {
    session: SessionId,
}

/// How the streaming body ended, short of releasing the channel.
enum StreamEnd {
    /// The full remaining sequence went out; `sent` data messages.
    Completed { sent: usize },
    /// The run directory was missing and the viewer was notified.
    MissingRun,
}

impl ReplayEngine {
    /// Create an engine tagged with the session identifier used in
    /// every log line of the run.
    pub const fn new(session: SessionId) -> Self {
        Self { session }
    }

    /// Replay the run at `run_dir` over `channel`, start to closedown.
    ///
    /// A missing run directory is recovered locally: the viewer gets a
    /// single best-effort error payload as a `data` message (never
    /// metadata, never closedown) and the run returns `Ok`.
    ///
    /// # Errors
    ///
    /// [`EngineError::Source`] for an empty run or a malformed filename
    /// or payload; [`EngineError::Session`] when the transport fails.
    /// Either aborts the remaining sequence immediately; the channel is
    /// disconnected before the error is returned.
    pub async fn run<C: ReplayChannel>(
        &self,
        mut channel: C,
        run_dir: &Path,
    ) -> Result<(), EngineError> {
        match self.stream(&mut channel, run_dir).await {
            Ok(StreamEnd::Completed { sent }) => {
                // Closing phase: closedown is the last outbound message.
                info!(session = %self.session, sent, "closing session");
                channel.close().await?;
                Ok(())
            }
            Ok(StreamEnd::MissingRun) => {
                channel.disconnect().await?;
                Ok(())
            }
            Err(e) => {
                warn!(session = %self.session, error = %e, "replay failed, releasing session");
                if let Err(release) = channel.disconnect().await {
                    warn!(session = %self.session, error = %release, "session release failed");
                }
                Err(e)
            }
        }
    }

    /// The metadata and streaming phases, up to but not including the
    /// release of the channel.
    async fn stream<C: ReplayChannel>(
        &self,
        channel: &mut C,
        run_dir: &Path,
    ) -> Result<StreamEnd, EngineError> {
        let run = match SimulationRun::open(run_dir) {
            Ok(run) => run,
            Err(SourceError::MissingRun(path)) => {
                warn!(
                    session = %self.session,
                    path = %path.display(),
                    "run directory missing, notifying viewer"
                );
                let payload = serde_json::to_value(ErrorPayload::missing_simulation_directory())?;
                channel.send(MessageKind::Data, payload).await?;
                return Ok(StreamEnd::MissingRun);
            }
            Err(e) => return Err(e.into()),
        };

        // Metadata phase: bounds computed once, sent exactly once.
        let metadata = run.metadata()?;
        info!(
            session = %self.session,
            run = run.name(),
            start = metadata.start,
            end = metadata.end,
            length = metadata.length,
            "sending run metadata"
        );
        let payload = serde_json::to_value(MetadataPayload::from(metadata))?;
        channel.send(MessageKind::Metadata, payload).await?;

        // Streaming phase: strict file order, stop checked before each
        // send, one snapshot in flight at a time.
        let mut sent: usize = 0;
        for snapshot in run.snapshots() {
            if channel.is_stopped() {
                info!(
                    session = %self.session,
                    sent,
                    remaining = run.len().saturating_sub(sent),
                    "viewer stopped the replay early"
                );
                break;
            }

            // A snapshot is sent atomically or not at all; a malformed
            // payload fails the whole run before its data message.
            let actors = snapshot.read_actors()?;
            let payload = serde_json::to_value(DataPayload::new(snapshot.timestamp(), actors))?;
            channel.send(MessageKind::Data, payload).await?;
            sent = sent.saturating_add(1);
            debug!(
                session = %self.session,
                snapshot = %snapshot.name(),
                timestamp = snapshot.timestamp(),
                "snapshot sent"
            );
        }

        Ok(StreamEnd::Completed { sent })
    }
}
