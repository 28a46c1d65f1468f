//! Unit tests for snapshot liveness and tile updates.
//!
//! Run with: cargo test --test snapshot_unit_test

mod common;

use chrono::{DateTime, Duration, Utc};
use common::{ts, utc};
use terrarium_dashboard::backend::models::SnapshotResponse;
use terrarium_dashboard::registry::Registry;
use terrarium_dashboard::tiles::{
    AlertState, Liveness, Snapshot, TileBoard, apply_snapshot, apply_unreachable,
};

fn threshold() -> Duration {
    Duration::minutes(10)
}

fn climate(at: DateTime<Utc>, temperature: f64, humidity: f64) -> Snapshot {
    Snapshot {
        temperature: Some(temperature),
        humidity: Some(humidity),
        timestamp: Some(at),
        ..Snapshot::default()
    }
}

#[test]
fn liveness_boundary_is_ten_minutes() {
    let now = ts("2024-06-01T12:00:00Z");

    let just_fresh = climate(now - Duration::seconds(9 * 60 + 59), 72.0, 60.0);
    let just_stale = climate(now - Duration::seconds(10 * 60 + 1), 72.0, 60.0);
    let exactly = climate(now - Duration::minutes(10), 72.0, 60.0);

    assert_eq!(just_fresh.liveness(now, threshold()).alert(), AlertState::Good);
    assert_eq!(just_stale.liveness(now, threshold()).alert(), AlertState::Bad);
    assert_eq!(
        exactly.liveness(now, threshold()),
        Liveness::Offline {
            since: now - Duration::minutes(10)
        }
    );
}

#[test]
fn online_climate_tile_shows_readings() {
    let registry = Registry::builtin();
    let mut board = TileBoard::build(&registry);
    let sensor = registry.find("whites").expect("whites registered");
    let now = ts("2024-06-01T12:00:00Z");

    let tile = board.get_mut("whites").expect("whites tile");
    let liveness = apply_snapshot(
        tile,
        sensor,
        &climate(ts("2024-06-01T11:58:00Z"), 72.5, 60.0),
        now,
        threshold(),
        &utc(),
    );

    assert_eq!(liveness, Liveness::Online);
    assert_eq!(tile.alert, AlertState::Good);
    assert_eq!(tile.reading, "Temp: 72.5°F | Humidity: 60.0%");
    assert_eq!(tile.last_updated.as_deref(), Some("Last updated: Jun 1, 11:58 AM"));
    assert_eq!(tile.in_range, Some(true));
}

#[test]
fn comfort_range_flags_out_of_range_readings() {
    let registry = Registry::builtin();
    let mut board = TileBoard::build(&registry);
    let now = ts("2024-06-01T12:00:00Z");

    let red_knee = registry.find("red knee").expect("red knee registered");
    let tile = board.get_mut("red knee").expect("red knee tile");
    apply_snapshot(tile, red_knee, &climate(now, 82.0, 65.0), now, threshold(), &utc());
    assert_eq!(tile.in_range, Some(false));

    // No comfort range configured
    let office = registry.find("office").expect("office registered");
    let tile = board.get_mut("office").expect("office tile");
    apply_snapshot(tile, office, &climate(now, 99.0, 5.0), now, threshold(), &utc());
    assert_eq!(tile.in_range, None);
}

#[test]
fn water_quality_tile_shows_tds() {
    let registry = Registry::builtin();
    let mut board = TileBoard::build(&registry);
    let sensor = registry.find("aquarium").expect("aquarium registered");
    let now = ts("2024-06-01T12:00:00Z");

    let snapshot = Snapshot {
        tds: Some(212.0),
        timestamp: Some(now),
        ..Snapshot::default()
    };
    let tile = board.get_mut("aquarium").expect("aquarium tile");
    apply_snapshot(tile, sensor, &snapshot, now, threshold(), &utc());
    assert_eq!(tile.reading, "TDS: 212.0 ppm");

    let no_tds = Snapshot {
        timestamp: Some(now),
        ..Snapshot::default()
    };
    apply_snapshot(tile, sensor, &no_tds, now, threshold(), &utc());
    assert_eq!(tile.reading, "TDS: 0.0 ppm");
}

#[test]
fn stale_tile_reports_its_own_time() {
    let registry = Registry::builtin();
    let mut board = TileBoard::build(&registry);
    let sensor = registry.find("green").expect("green registered");
    let now = ts("2024-06-01T15:00:00Z");

    let tile = board.get_mut("green").expect("green tile");
    apply_snapshot(
        tile,
        sensor,
        &climate(ts("2024-06-01T09:05:00Z"), 75.0, 70.0),
        now,
        threshold(),
        &utc(),
    );

    assert_eq!(tile.alert, AlertState::Bad);
    assert_eq!(tile.reading, "Offline since Jun 1, 9:05 AM");
    assert_eq!(tile.in_range, None);
}

#[test]
fn error_flag_short_circuits() {
    let registry = Registry::builtin();
    let mut board = TileBoard::build(&registry);
    let sensor = registry.find("bedroom").expect("bedroom registered");
    let now = ts("2024-06-01T12:00:00Z");

    let tile = board.get_mut("bedroom").expect("bedroom tile");
    let liveness = apply_snapshot(tile, sensor, &Snapshot::errored(), now, threshold(), &utc());

    assert_eq!(liveness, Liveness::NoData);
    assert_eq!(tile.alert, AlertState::Bad);
    assert_eq!(tile.reading, "No data available");
    assert_eq!(tile.last_updated, None);
}

#[test]
fn unreachable_keeps_last_update_label() {
    let registry = Registry::builtin();
    let mut board = TileBoard::build(&registry);
    let sensor = registry.find("living room").expect("living room registered");
    let now = ts("2024-06-01T12:00:00Z");

    let tile = board.get_mut("living room").expect("living room tile");
    apply_snapshot(tile, sensor, &climate(now, 70.0, 40.0), now, threshold(), &utc());
    apply_unreachable(tile);

    assert_eq!(tile.alert, AlertState::Bad);
    assert_eq!(tile.reading, "Sensor unreachable");
    assert_eq!(tile.last_updated.as_deref(), Some("Last updated: Jun 1, 12:00 PM"));
}

#[test]
fn snapshot_body_accepts_strings_and_numbers() {
    let body: SnapshotResponse = serde_json::from_str(
        r#"{"time":"2024-06-01 11:59:00","sensor":"Whites","temp":"72.5","humidity":61,"lux":null}"#,
    )
    .expect("snapshot json");

    let snapshot = body.into_snapshot(&utc()).expect("readable snapshot");

    assert_eq!(snapshot.temperature, Some(72.5));
    assert_eq!(snapshot.humidity, Some(61.0));
    assert_eq!(snapshot.lux, None);
    assert_eq!(snapshot.timestamp, Some(ts("2024-06-01T11:59:00Z")));
    assert!(!snapshot.error);
}

#[test]
fn snapshot_body_reads_uppercase_tds() {
    let body: SnapshotResponse =
        serde_json::from_str(r#"{"time":"2024-06-01T11:59:00Z","TDS":"245.5"}"#)
            .expect("snapshot json");

    assert_eq!(body.into_snapshot(&utc()).expect("snapshot").tds, Some(245.5));
}

#[test]
fn snapshot_error_flags() {
    for raw in [r#"{"error":true}"#, r#"{"error":"no data","detail":"x"}"#] {
        let body: SnapshotResponse = serde_json::from_str(raw).expect("error json");
        assert!(body.is_error());
        assert_eq!(body.into_snapshot(&utc()).expect("snapshot"), Snapshot::errored());
    }

    let body: SnapshotResponse =
        serde_json::from_str(r#"{"error":false,"time":"2024-06-01T11:59:00Z"}"#)
            .expect("snapshot json");
    assert!(!body.is_error());
}

#[test]
fn snapshot_without_time_is_a_decode_failure() {
    let body: SnapshotResponse =
        serde_json::from_str(r#"{"temp":"72"}"#).expect("snapshot json");

    assert!(body.into_snapshot(&utc()).is_err());
}
