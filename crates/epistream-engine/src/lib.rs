//! Replay engine for the Epistream replay service.
//!
//! The engine drives one session from an already-connected channel to
//! an orderly closedown:
//!
//! ```text
//! Metadata -> Streaming -> Closing -> Done
//! ```
//!
//! Metadata (run bounds and length) is sent exactly once, before any
//! data. Snapshots are then streamed in strict file order, one in-flight
//! message at a time, with the viewer's cancellation flag checked before
//! every send. Closedown is always the last outbound message of a
//! completed or cleanly stopped run. Any fatal source or transport
//! error aborts the remaining sequence and surfaces to the invocation
//! adapter; there is no retry here.

pub mod error;
pub mod replay;

pub use error::EngineError;
pub use replay::ReplayEngine;
