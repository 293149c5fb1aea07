//! Snapshot source for the Epistream replay service.
//!
//! A simulation run is a directory of per-snapshot GeoJSON files, one per
//! timestamp, named `{tag}_{yyyy}_{mm}_{dd}_{hh}_{mm}_{ss}.geojson` so
//! that lexicographic filename order is chronological order. This crate
//! enumerates and validates that sequence and extracts the per-actor
//! records from each snapshot.
//!
//! Reading is synchronous and bounded: one file at a time, read fully
//! into memory, never mutated, discarded after the caller is done with
//! it. The run itself is immutable once opened.

pub mod error;
pub mod run;
pub mod snapshot;

pub use error::SourceError;
pub use run::SimulationRun;
pub use snapshot::SnapshotFile;
