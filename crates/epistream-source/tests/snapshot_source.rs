//! Integration tests for run enumeration and snapshot parsing.
//!
//! Each test builds its own run directory under the system temp dir
//! (unique per process and thread so parallel tests never collide) and
//! exercises the source against real files.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::PathBuf;

use epistream_source::{SimulationRun, SourceError};
use epistream_types::{ActorId, HealthStatus};

/// Create a unique, empty run directory named so that its grouping key
/// is `sim_2020_05_01`.
fn run_dir(label: &str) -> PathBuf {
    let unique = format!(
        "sim_2020_05_01_{label}_{}_{:?}",
        std::process::id(),
        std::thread::current().id(),
    );
    let dir = std::env::temp_dir().join(unique);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// A well-formed snapshot payload: one actor plus one road feature that
/// must be skipped.
fn actor_collection(status: &str) -> String {
    format!(
        r#"{{
            "type": "FeatureCollection",
            "features": [
                {{
                    "type": "Feature",
                    "id": 42,
                    "geometry": {{"type": "Point", "coordinates": [174.76, -36.85]}},
                    "properties": {{"type": "Actor", "status": "{status}"}}
                }},
                {{
                    "type": "Feature",
                    "geometry": {{"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}},
                    "properties": {{"type": "Road"}}
                }}
            ]
        }}"#
    )
}

#[test]
fn open_missing_directory_fails() {
    let dir = std::env::temp_dir().join("epistream_no_such_run_dir");
    let result = SimulationRun::open(&dir);
    assert!(matches!(result, Err(SourceError::MissingRun(_))));
}

#[test]
fn open_plain_file_fails() {
    let dir = run_dir("notadir");
    let file = dir.join("sim_2020_05_01_00_00_00.geojson");
    fs::write(&file, actor_collection("Infected")).unwrap();
    let result = SimulationRun::open(&file);
    assert!(matches!(result, Err(SourceError::MissingRun(_))));
}

#[test]
fn empty_run_opens_but_has_no_metadata() {
    let dir = run_dir("empty");
    let run = SimulationRun::open(&dir).unwrap();
    assert!(run.is_empty());
    assert!(matches!(run.metadata(), Err(SourceError::EmptyRun)));
}

#[test]
fn enumeration_filters_by_key_and_extension() {
    let dir = run_dir("filter");
    fs::write(
        dir.join("sim_2020_05_01_00_00_00.geojson"),
        actor_collection("Infected"),
    )
    .unwrap();
    // Wrong extension, wrong prefix, and non-snapshot clutter.
    fs::write(dir.join("sim_2020_05_01_00_10_00.txt"), "not a snapshot").unwrap();
    fs::write(
        dir.join("other_2020_05_01_00_20_00.geojson"),
        actor_collection("Infected"),
    )
    .unwrap();
    fs::write(dir.join("README.md"), "run notes").unwrap();

    let run = SimulationRun::open(&dir).unwrap();
    assert_eq!(run.len(), 1);
}

#[test]
fn two_file_run_is_ordered_with_correct_metadata() {
    let dir = run_dir("scenario");
    // Written out of chronological order on purpose.
    fs::write(
        dir.join("sim_2020_05_01_00_10_00.geojson"),
        actor_collection("recovered"),
    )
    .unwrap();
    fs::write(
        dir.join("sim_2020_05_01_00_00_00.geojson"),
        actor_collection("Infected"),
    )
    .unwrap();

    let run = SimulationRun::open(&dir).unwrap();
    let meta = run.metadata().unwrap();
    assert_eq!(meta.length, 2);
    assert!(meta.start < meta.end);

    let timestamps: Vec<i64> = run.snapshots().iter().map(|s| s.timestamp()).collect();
    assert_eq!(timestamps, vec![meta.start, meta.end]);
}

#[test]
fn malformed_filename_fails_open() {
    let dir = run_dir("badname");
    fs::write(
        dir.join("sim_2020_05_01_late.geojson"),
        actor_collection("Infected"),
    )
    .unwrap();
    let result = SimulationRun::open(&dir);
    assert!(matches!(result, Err(SourceError::MalformedName { .. })));
}

#[test]
fn read_actors_extracts_actor_and_skips_road() {
    let dir = run_dir("extract");
    fs::write(
        dir.join("sim_2020_05_01_00_00_00.geojson"),
        actor_collection("Infected"),
    )
    .unwrap();

    let run = SimulationRun::open(&dir).unwrap();
    let actors = run.snapshots().first().unwrap().read_actors().unwrap();
    assert_eq!(actors.len(), 1);

    let actor = actors.first().unwrap();
    assert_eq!(actor.id, ActorId::from(42));
    assert_eq!(actor.position, vec![174.76, -36.85]);
    assert_eq!(actor.status, HealthStatus::INFECTED);
}

#[test]
fn status_label_case_is_normalized() {
    let dir = run_dir("lowercase");
    fs::write(
        dir.join("sim_2020_05_01_00_00_00.geojson"),
        actor_collection("susceptible"),
    )
    .unwrap();

    let run = SimulationRun::open(&dir).unwrap();
    let actors = run.snapshots().first().unwrap().read_actors().unwrap();
    assert_eq!(actors.first().map(|a| a.status), Some(HealthStatus::SUSCEPTIBLE));
}

#[test]
fn unknown_status_label_passes_through() {
    let dir = run_dir("passthrough");
    fs::write(
        dir.join("sim_2020_05_01_00_00_00.geojson"),
        actor_collection("quarantined"),
    )
    .unwrap();

    let run = SimulationRun::open(&dir).unwrap();
    let actors = run.snapshots().first().unwrap().read_actors().unwrap();
    let status = actors.first().map(|a| a.status).unwrap();
    assert_eq!(status.code(), 'Q');
    assert!(!status.is_recognized());
}

#[test]
fn polygon_actor_geometry_fails() {
    let dir = run_dir("polygon");
    fs::write(
        dir.join("sim_2020_05_01_00_00_00.geojson"),
        r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "id": 1,
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                },
                "properties": {"type": "Actor", "status": "Infected"}
            }]
        }"#,
    )
    .unwrap();

    let run = SimulationRun::open(&dir).unwrap();
    let result = run.snapshots().first().unwrap().read_actors();
    assert!(matches!(result, Err(SourceError::Format { .. })));
}

#[test]
fn actor_without_id_fails() {
    let dir = run_dir("noid");
    fs::write(
        dir.join("sim_2020_05_01_00_00_00.geojson"),
        r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
                "properties": {"type": "Actor", "status": "Infected"}
            }]
        }"#,
    )
    .unwrap();

    let run = SimulationRun::open(&dir).unwrap();
    let result = run.snapshots().first().unwrap().read_actors();
    assert!(matches!(result, Err(SourceError::Format { .. })));
}

#[test]
fn actor_with_empty_status_fails() {
    let dir = run_dir("nostatus");
    fs::write(
        dir.join("sim_2020_05_01_00_00_00.geojson"),
        r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "id": 1,
                "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
                "properties": {"type": "Actor", "status": ""}
            }]
        }"#,
    )
    .unwrap();

    let run = SimulationRun::open(&dir).unwrap();
    let result = run.snapshots().first().unwrap().read_actors();
    assert!(matches!(result, Err(SourceError::Format { .. })));
}

#[test]
fn top_level_feature_is_not_a_collection() {
    let dir = run_dir("notcollection");
    fs::write(
        dir.join("sim_2020_05_01_00_00_00.geojson"),
        r#"{
            "type": "Feature",
            "id": 1,
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
            "properties": {"type": "Actor", "status": "Infected"}
        }"#,
    )
    .unwrap();

    let run = SimulationRun::open(&dir).unwrap();
    let result = run.snapshots().first().unwrap().read_actors();
    assert!(matches!(result, Err(SourceError::Format { .. })));
}

#[test]
fn unparseable_payload_fails() {
    let dir = run_dir("garbage");
    fs::write(dir.join("sim_2020_05_01_00_00_00.geojson"), "not json at all").unwrap();

    let run = SimulationRun::open(&dir).unwrap();
    let result = run.snapshots().first().unwrap().read_actors();
    assert!(matches!(result, Err(SourceError::Format { .. })));
}

#[test]
fn string_actor_ids_are_preserved() {
    let dir = run_dir("stringid");
    fs::write(
        dir.join("sim_2020_05_01_00_00_00.geojson"),
        r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "id": "actor-7",
                "geometry": {"type": "Point", "coordinates": [1.0, 2.0, 3.0]},
                "properties": {"type": "Actor", "status": "Dead"}
            }]
        }"#,
    )
    .unwrap();

    let run = SimulationRun::open(&dir).unwrap();
    let actors = run.snapshots().first().unwrap().read_actors().unwrap();
    let actor = actors.first().unwrap();
    assert_eq!(actor.id, ActorId::from("actor-7"));
    // 3D positions are forwarded verbatim.
    assert_eq!(actor.position.len(), 3);
    assert_eq!(actor.status, HealthStatus::DEAD);
}
