//! Integration tests for the sensor backend client and the tile refresh cycle,
//! run against an in-process fake backend.
//!
//! Run with: cargo test --test backend_integration_test

mod common;

use common::{spawn_backend, test_config, test_state};
use terrarium_dashboard::backend::BackendClient;
use terrarium_dashboard::error::AppError;
use terrarium_dashboard::sync::worker::{
    RefreshOutcome, RefreshSummary, refresh_all, refresh_sensor,
};
use terrarium_dashboard::tiles::AlertState;
use tokio_test::assert_ok;

async fn client() -> BackendClient {
    let base_url = spawn_backend().await;
    BackendClient::new(&test_config(&base_url)).expect("backend client")
}

#[test]
fn endpoint_encodes_sensor_ids() {
    let client = BackendClient::new(&test_config("http://frogpi.local:5000/frogtank/"))
        .expect("backend client");

    assert_eq!(
        client.endpoint("red knee").as_str(),
        "http://frogpi.local:5000/frogtank/sensor/red%20knee"
    );
    assert_eq!(
        client.endpoint("whites-log").as_str(),
        "http://frogpi.local:5000/frogtank/sensor/whites-log"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = BackendClient::new(&test_config("not a url"));
    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn snapshot_decodes_string_readings() {
    let client = client().await;

    let snapshot = assert_ok!(client.get_snapshot("whites").await);

    assert!(!snapshot.error);
    assert_eq!(snapshot.temperature, Some(72.5));
    assert_eq!(snapshot.humidity, Some(60.1));
    assert!(snapshot.timestamp.is_some());
}

#[tokio::test]
async fn snapshot_reaches_ids_with_spaces() {
    let client = client().await;

    let snapshot = assert_ok!(client.get_snapshot("red knee").await);

    assert_eq!(snapshot.temperature, Some(78.0));
}

#[tokio::test]
async fn no_data_body_on_404_is_an_errored_snapshot() {
    let client = client().await;

    let snapshot = assert_ok!(client.get_snapshot("bedroom").await);

    assert!(snapshot.error);
    assert_eq!(snapshot.timestamp, None);
}

#[tokio::test]
async fn server_error_without_body_is_a_backend_error() {
    let client = client().await;

    let result = client.get_snapshot("office").await;

    assert!(matches!(result, Err(AppError::Backend(msg)) if msg.contains("500")));
}

#[tokio::test]
async fn series_decodes_the_log() {
    let client = client().await;

    let series = assert_ok!(client.fetch_series("living room").await);
    assert_eq!(series.len(), 180);
    assert!(!series.has_lux());

    let aquarium = assert_ok!(client.fetch_series("aquarium").await);
    assert_eq!(aquarium.len(), 30);
    assert!(aquarium.has_tds());

    let missing = client.fetch_series("bedroom").await;
    assert!(matches!(missing, Err(AppError::Backend(_))));
}

#[tokio::test]
async fn recent_series_matches_the_tail_of_the_full_log() {
    let client = client().await;

    let full = assert_ok!(client.fetch_series("whites").await);
    let recent = assert_ok!(client.fetch_recent_series("whites", 20).await);

    assert_eq!(recent.len(), 20);
    assert_eq!(recent, full.tail(20));

    let printer = assert_ok!(client.fetch_recent_series("3d printer", 20).await);
    assert!(printer.is_empty());
}

#[tokio::test]
async fn refresh_cycle_updates_every_real_tile() {
    let state = test_state().await;

    let summary = refresh_all(&state).await;

    assert_eq!(
        summary,
        RefreshSummary {
            refreshed: 6,
            failed: 3,
            skipped: 0,
        }
    );

    let board = state.board.read().await;
    let tile = |id: &str| board.get(id).expect("tile exists");

    let whites = tile("whites");
    assert_eq!(whites.alert, AlertState::Good);
    assert_eq!(whites.reading, "Temp: 72.5°F | Humidity: 60.1%");
    assert!(whites.last_updated.is_some());
    let chart = whites.chart.current().expect("mini chart");
    assert_eq!(chart.config.labels.len(), 20);
    assert_eq!(chart.config.datasets.len(), 2);

    let red_knee = tile("red knee");
    assert_eq!(red_knee.alert, AlertState::Bad);
    assert!(red_knee.reading.starts_with("Offline since "));

    let aquarium = tile("aquarium");
    assert_eq!(aquarium.alert, AlertState::Good);
    assert_eq!(aquarium.reading, "TDS: 212.0 ppm");
    let chart = aquarium.chart.current().expect("tds chart");
    assert_eq!(chart.config.options.y_axis.max, Some(500.0));

    let office = tile("office");
    assert_eq!(office.alert, AlertState::Bad);
    assert_eq!(office.reading, "Sensor unreachable");
    assert!(office.chart.current().is_none());

    let bedroom = tile("bedroom");
    assert_eq!(bedroom.alert, AlertState::Bad);
    assert_eq!(bedroom.reading, "No data available");

    // An undecodable log draws an empty chart rather than failing
    let printer = tile("3d printer");
    assert_eq!(
        printer.chart.current().expect("empty chart").config.labels.len(),
        0
    );

    for placeholder in ["coming-1", "coming-2", "coming-3"] {
        let t = tile(placeholder);
        assert_eq!(t.alert, AlertState::Unknown);
        assert_eq!(t.chart.revisions(), 1);
    }
}

#[tokio::test]
async fn repeated_refresh_replaces_charts() {
    let state = test_state().await;

    refresh_all(&state).await;
    refresh_all(&state).await;

    let board = state.board.read().await;
    let whites = board.get("whites").expect("whites tile");
    assert_eq!(whites.chart.revisions(), 2);
    assert_eq!(whites.chart.current().expect("chart").revision, 2);
}

#[tokio::test]
async fn overlapping_refresh_is_skipped() {
    let state = test_state().await;
    let sensor = state
        .registry
        .find("whites")
        .cloned()
        .expect("whites registered");

    let guard = state.in_flight.try_claim("whites").expect("first claim");
    assert!(state.in_flight.try_claim("whites").is_none());

    assert_eq!(refresh_sensor(&state, &sensor).await, RefreshOutcome::Skipped);
    assert_eq!(
        state.board.read().await.get("whites").expect("tile").alert,
        AlertState::Unknown
    );

    drop(guard);
    assert!(!state.in_flight.is_claimed("whites"));
    assert_eq!(refresh_sensor(&state, &sensor).await, RefreshOutcome::Refreshed);
}
