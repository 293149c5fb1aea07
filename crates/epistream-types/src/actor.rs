//! Actor records extracted from simulation snapshot files.
//!
//! Each snapshot file carries a GeoJSON feature collection; the features
//! tagged as actors are reduced to the minimal record the viewer needs:
//! an opaque identifier, a 2D or 3D position, and a one-character health
//! status code.

use serde::{Deserialize, Serialize};

/// Opaque actor identifier.
///
/// Snapshot files may identify actors by string or by number; the
/// identifier is forwarded to the viewer verbatim either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActorId {
    /// A string identifier.
    Text(String),
    /// A numeric identifier.
    Number(serde_json::Number),
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_owned())
    }
}

impl From<i64> for ActorId {
    fn from(id: i64) -> Self {
        Self::Number(serde_json::Number::from(id))
    }
}

impl core::fmt::Display for ActorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One-character epidemic health status code.
///
/// The code is the upper-cased first character of the status label found
/// in the snapshot file. The recognized codes are `S`, `E`, `I`, `R`, `D`
/// (susceptible, exposed, infected, recovered, dead), but unrecognized
/// characters are carried through unvalidated -- callers that care can
/// check [`is_recognized`](Self::is_recognized).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HealthStatus(char);

impl HealthStatus {
    /// Not yet infected.
    pub const SUSCEPTIBLE: Self = Self('S');
    /// Infected but not yet infectious.
    pub const EXPOSED: Self = Self('E');
    /// Actively infectious.
    pub const INFECTED: Self = Self('I');
    /// No longer infectious, immune.
    pub const RECOVERED: Self = Self('R');
    /// Removed from the simulation.
    pub const DEAD: Self = Self('D');

    /// Derive a status code from a free-form status label.
    ///
    /// Takes the upper-cased first character of the label; returns `None`
    /// for an empty label. `"Infected"` and `"infected"` both yield `I`.
    pub fn from_label(label: &str) -> Option<Self> {
        let first = label.chars().next()?;
        first.to_uppercase().next().map(Self)
    }

    /// The one-character code.
    pub const fn code(self) -> char {
        self.0
    }

    /// Whether the code is one of the five known S/E/I/R/D states.
    pub const fn is_recognized(self) -> bool {
        matches!(self.0, 'S' | 'E' | 'I' | 'R' | 'D')
    }
}

impl core::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The state of a single actor at one snapshot instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorState {
    /// Actor identifier, forwarded verbatim from the snapshot file.
    pub id: ActorId,
    /// Position coordinates, 2D or 3D, forwarded verbatim.
    pub position: Vec<f64>,
    /// One-character health status code.
    pub status: HealthStatus,
}
