//! Replay worker entry point for the Epistream service.
//!
//! The worker bridges the scheduler's job queue into replay sessions.
//! It receives job submissions over NATS, opens a WebSocket session to
//! the requested viewer endpoint, replays the named simulation run
//! through the engine, and acknowledges the terminal outcome on the
//! job's reply subject.
//!
//! # Architecture
//!
//! ```text
//! NATS (job) --> WsChannel (connect) --> ReplayEngine --> NATS (outcome)
//! ```
//!
//! One job is processed at a time; each job owns an independent
//! connection, cancellation flag, and snapshot source.

mod config;
mod error;
mod worker;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::WorkerConfig;
use crate::error::WorkerError;
use crate::worker::ReplayWorker;

/// Application entry point.
///
/// Initializes logging, loads configuration from environment variables,
/// connects to NATS, then runs the job loop indefinitely.
///
/// # Errors
///
/// Returns an error if initialization or the job loop fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("epistream-worker starting");

    // Load configuration from environment
    let config = WorkerConfig::from_env()?;
    info!(
        nats_url = config.nats_url,
        subject = config.subject,
        data_dir = %config.data_dir.display(),
        "configuration loaded"
    );

    // Connect to NATS
    info!(url = config.nats_url, "connecting to NATS server");
    let client = async_nats::connect(&config.nats_url)
        .await
        .map_err(|e| WorkerError::Nats(format!("failed to connect to {}: {e}", config.nats_url)))?;
    info!("NATS connection established");

    // Build and run the worker
    let worker = ReplayWorker::new(client, config.subject, config.data_dir);
    info!("worker initialized, entering job loop");
    worker.run().await?;

    Ok(())
}
