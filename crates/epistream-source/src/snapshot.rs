//! One snapshot file: filename timestamp parsing and actor extraction.
//!
//! Snapshot payloads are GeoJSON feature collections. Features whose
//! `type` property is `Actor` are reduced to [`ActorState`] records;
//! everything else in the collection is skipped. An actor feature must
//! be a Point with an id and a non-empty `status` property, otherwise
//! the whole snapshot is rejected -- a snapshot is delivered atomically
//! or not at all.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use epistream_types::{ActorId, ActorState, HealthStatus};
use geojson::GeoJson;
use geojson::feature::Id;
use tracing::debug;

use crate::error::SourceError;

/// The feature property that marks a feature as an actor.
const TYPE_PROPERTY: &str = "type";

/// The property value marking actor features.
const ACTOR_TYPE: &str = "Actor";

/// The feature property carrying the health status label.
const STATUS_PROPERTY: &str = "status";

/// A handle on one snapshot file: its path plus the timestamp parsed
/// from its filename.
///
/// The payload itself is read lazily by [`read_actors`](Self::read_actors),
/// one snapshot at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    path: PathBuf,
    timestamp: i64,
}

impl SnapshotFile {
    /// Wrap a snapshot path, parsing the filename timestamp.
    pub(crate) fn open(path: PathBuf) -> Result<Self, SourceError> {
        let timestamp = timestamp_of(&path)?;
        Ok(Self { path, timestamp })
    }

    /// The snapshot instant, milliseconds since epoch (UTC).
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// The snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The snapshot filename, for logs and error messages.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Read the snapshot payload and extract its actor records.
    ///
    /// The file is read fully into memory and parsed as a GeoJSON
    /// feature collection. Actor records are returned in feature order.
    ///
    /// # Errors
    ///
    /// [`SourceError::Format`] when the top level is not a feature
    /// collection, a feature is structurally invalid, or an actor
    /// feature has a non-Point geometry, no id, or no usable status.
    pub fn read_actors(&self) -> Result<Vec<ActorState>, SourceError> {
        let raw = fs::read_to_string(&self.path)?;
        let geojson: GeoJson = raw
            .parse()
            .map_err(|e: geojson::Error| self.format_error(e.to_string()))?;
        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(self.format_error("top-level value is not a FeatureCollection"));
        };

        let mut actors = Vec::new();
        for feature in collection.features {
            let is_actor = feature
                .properties
                .as_ref()
                .and_then(|props| props.get(TYPE_PROPERTY))
                .and_then(serde_json::Value::as_str)
                == Some(ACTOR_TYPE);
            if !is_actor {
                continue;
            }

            let geometry = feature
                .geometry
                .ok_or_else(|| self.format_error("actor feature has no geometry"))?;
            let geojson::Value::Point(position) = geometry.value else {
                return Err(self.format_error("actor feature geometry must be a Point"));
            };

            let id = match feature.id {
                Some(Id::String(s)) => ActorId::Text(s),
                Some(Id::Number(n)) => ActorId::Number(n),
                None => return Err(self.format_error("actor feature has no id")),
            };

            let status = feature
                .properties
                .as_ref()
                .and_then(|props| props.get(STATUS_PROPERTY))
                .and_then(serde_json::Value::as_str)
                .and_then(HealthStatus::from_label)
                .ok_or_else(|| self.format_error("actor feature has no usable status property"))?;
            if !status.is_recognized() {
                debug!(
                    snapshot = %self.name(),
                    status = %status,
                    "unrecognized health status code passed through"
                );
            }

            actors.push(ActorState {
                id,
                position,
                status,
            });
        }

        debug!(snapshot = %self.name(), actors = actors.len(), "snapshot payload parsed");
        Ok(actors)
    }

    fn format_error(&self, reason: impl Into<String>) -> SourceError {
        SourceError::Format {
            name: self.name(),
            reason: reason.into(),
        }
    }
}

/// Parse the timestamp embedded in a snapshot filename.
///
/// The stem is underscore-separated: a leading run tag followed by
/// exactly six numeric groups, year through second, interpreted as UTC.
/// `sim_2020_05_01_00_10_00.geojson` is 2020-05-01 00:10:00 UTC.
fn timestamp_of(path: &Path) -> Result<i64, SourceError> {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut groups = stem.split('_');
    // The leading component is the run tag, not part of the timestamp.
    groups.next();
    let fields: Vec<&str> = groups.collect();
    let [year, month, day, hour, minute, second] = fields.as_slice() else {
        return Err(malformed(
            path,
            format!("expected 6 timestamp groups, found {}", fields.len()),
        ));
    };

    let year: i32 = parse_group(year, "year", path)?;
    let month: u32 = parse_group(month, "month", path)?;
    let day: u32 = parse_group(day, "day", path)?;
    let hour: u32 = parse_group(hour, "hour", path)?;
    let minute: u32 = parse_group(minute, "minute", path)?;
    let second: u32 = parse_group(second, "second", path)?;

    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
        .map(|instant| instant.timestamp_millis())
        .ok_or_else(|| malformed(path, "timestamp is not a valid calendar time"))
}

/// Parse one numeric timestamp group.
fn parse_group<T: std::str::FromStr>(group: &str, what: &str, path: &Path) -> Result<T, SourceError>
where
    T::Err: std::fmt::Display,
{
    group
        .parse()
        .map_err(|e| malformed(path, format!("non-numeric {what} group {group:?}: {e}")))
}

fn malformed(path: &Path, reason: impl Into<String>) -> SourceError {
    SourceError::MalformedName {
        name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        reason: reason.into(),
    }
}
