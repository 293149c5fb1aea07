//! Type-safe identifier wrapper around [`Uuid`].
//!
//! Every replay run is tagged with a session identifier so log lines and
//! job outcomes from concurrent workers can be correlated. Sessions use
//! UUID v7 (time-ordered) so identifiers sort by creation time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single replay session.
///
/// One session corresponds to one connection to a remote viewer; the
/// identifier is minted when the job is picked up and carried through
/// every log line and the final [`ReplayOutcome`](crate::job::ReplayOutcome).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for SessionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<SessionId> for Uuid {
    fn from(id: SessionId) -> Self {
        id.0
    }
}
