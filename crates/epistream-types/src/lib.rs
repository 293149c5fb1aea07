//! Shared type definitions for the Epistream replay service.
//!
//! This crate is the single source of truth for the types that cross crate
//! boundaries in the Epistream workspace: the per-actor snapshot records
//! extracted from simulation files, the JSON wire envelopes exchanged with
//! the remote viewer, and the request/outcome payloads of the job dispatch
//! boundary.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for session identifiers
//! - [`actor`] -- Actor records and health status codes
//! - [`wire`] -- Outbound/inbound message envelopes and payloads
//! - [`job`] -- Replay request and outcome types for the job boundary

pub mod actor;
pub mod ids;
pub mod job;
pub mod wire;

// Re-export all public types at crate root for convenience.
pub use actor::{ActorId, ActorState, HealthStatus};
pub use ids::SessionId;
pub use job::{ReplayOutcome, ReplayParams, ReplayRequest, RunStatus};
pub use wire::{
    ControlAction, ControlPayload, DataPayload, Envelope, ErrorPayload, MessageKind,
    MetadataPayload, SessionMetadata, StreamTag,
};
