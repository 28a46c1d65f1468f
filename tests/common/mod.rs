//! Shared fixtures: an in-process stand-in for the sensor backend.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Duration, FixedOffset, SecondsFormat, Utc};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

use terrarium_dashboard::common::AppState;
use terrarium_dashboard::config::Config;
use terrarium_dashboard::registry::Registry;

pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).expect("zero offset")
}

pub fn ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

fn rfc3339(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Readings the fake backend serves, anchored at the time it was started.
#[derive(Clone)]
pub struct FakeBackend {
    pub started: DateTime<Utc>,
}

impl FakeBackend {
    /// One climate row per minute for the last three hours.
    fn climate_log(&self, name: &str) -> String {
        let mut body = String::new();
        for minutes_ago in (0..180).rev() {
            let t = self.started - Duration::minutes(minutes_ago);
            body.push_str(&format!(
                "{},{name},{:.1},{:.1},,\n",
                rfc3339(t),
                72.0 + (minutes_ago % 5) as f64 * 0.5,
                60.0 + (minutes_ago % 3) as f64
            ));
        }
        body
    }

    fn aquarium_log(&self) -> String {
        let mut body = String::new();
        for minutes_ago in (0..30).rev() {
            let t = self.started - Duration::minutes(minutes_ago);
            body.push_str(&format!("{},aquarium,,,,{}\n", rfc3339(t), 200 + minutes_ago));
        }
        body
    }
}

async fn sensor(State(fake): State<Arc<FakeBackend>>, Path(name): Path<String>) -> Response {
    if let Some(id) = name.strip_suffix("-log") {
        return match id {
            "aquarium" => fake.aquarium_log().into_response(),
            "whites" | "green" | "red knee" | "living room" => fake.climate_log(id).into_response(),
            "3d printer" => "garbage\n\n".into_response(),
            _ => (StatusCode::NOT_FOUND, "Log file not found").into_response(),
        };
    }

    let fresh = rfc3339(fake.started - Duration::minutes(1));
    match name.as_str() {
        "whites" | "green" | "living room" => Json(json!({
            "time": fresh,
            "sensor": name,
            "temp": "72.5",
            "humidity": "60.1",
            "lux": null,
            "tds": null
        }))
        .into_response(),
        "red knee" => Json(json!({
            "time": rfc3339(fake.started - Duration::hours(2)),
            "temp": 78.0,
            "humidity": 65.0
        }))
        .into_response(),
        "aquarium" => Json(json!({
            "time": fresh,
            "temp": "",
            "humidity": "",
            "TDS": "212"
        }))
        .into_response(),
        "office" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "no data", "detail": "missing log"})),
        )
            .into_response(),
    }
}

/// Serve the fake backend on an ephemeral port; returns its base URL.
pub async fn spawn_backend() -> String {
    let fake = Arc::new(FakeBackend {
        started: Utc::now(),
    });
    let app = Router::new()
        .route("/frogtank/sensor/{name}", get(sensor))
        .with_state(fake);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake backend");
    });

    format!("http://{addr}/frogtank")
}

pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::with_base_url(base_url);
    config.display_utc_offset_minutes = Some(0);
    config.disable_rate_limiting = true;
    config
}

pub async fn test_state() -> AppState {
    let base_url = spawn_backend().await;
    AppState::new(test_config(&base_url), Registry::builtin()).expect("app state")
}
