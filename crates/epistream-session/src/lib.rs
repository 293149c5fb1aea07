//! Session channel for the Epistream replay service.
//!
//! A session is one persistent, bidirectional, message-oriented
//! connection to a single remote viewer. This crate owns the connection
//! lifecycle: the authenticated WebSocket handshake, outbound envelope
//! delivery with explicit flushing, a background receive task that
//! watches for the viewer's `stop` command, and the closedown/drain
//! sequence.
//!
//! The replay engine drives a session through the [`ReplayChannel`]
//! trait; [`WsChannel`] is the single concrete implementation.
//!
//! # Concurrency
//!
//! Exactly one piece of state is shared between the replay loop and the
//! receive task: the boolean cancellation flag. The receive task is its
//! only writer and the replay loop its only reader, so a relaxed atomic
//! is sufficient.

pub mod channel;
pub mod error;
pub mod ws;

pub use channel::ReplayChannel;
pub use error::SessionError;
pub use ws::WsChannel;
