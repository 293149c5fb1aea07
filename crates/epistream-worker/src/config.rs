//! Configuration types for the replay worker.
//!
//! All configuration is loaded from environment variables. The worker
//! needs to know how to reach NATS, which subject carries replay jobs,
//! and where the simulation run directories live.

use std::path::PathBuf;

use crate::error::WorkerError;

/// Default subject carrying replay job submissions.
const DEFAULT_SUBJECT: &str = "replay.submit";

/// Complete worker configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// NATS server URL (e.g. `nats://localhost:4222`).
    pub nats_url: String,
    /// Subject to subscribe to for replay jobs.
    pub subject: String,
    /// Directory containing simulation run directories.
    pub data_dir: PathBuf,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `NATS_URL` -- NATS server connection string
    /// - `SIMULATION_DATA_DIR` -- directory holding run directories
    ///
    /// Optional variables:
    /// - `REPLAY_SUBJECT` -- job subject (default `replay.submit`)
    pub fn from_env() -> Result<Self, WorkerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, WorkerError> {
        let nats_url = require(&get, "NATS_URL")?;
        let data_dir = PathBuf::from(require(&get, "SIMULATION_DATA_DIR")?);
        let subject = get("REPLAY_SUBJECT").unwrap_or_else(|| DEFAULT_SUBJECT.to_owned());

        Ok(Self {
            nats_url,
            subject,
            data_dir,
        })
    }
}

/// Read a required variable through the lookup.
fn require(
    get: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, WorkerError> {
    get(name).ok_or_else(|| WorkerError::Config(format!("missing required env var {name}")))
}
