use chrono::{DateTime, Duration, TimeZone, Utc};

use super::board::{AlertState, Tile};
use crate::registry::SensorDescriptor;
use crate::series::time::format_full;

pub const NO_DATA_TEXT: &str = "No data available";
pub const UNREACHABLE_TEXT: &str = "Sensor unreachable";

/// Latest single reading reported for a sensor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub lux: Option<f64>,
    pub tds: Option<f64>,
    /// Present whenever `error` is false
    pub timestamp: Option<DateTime<Utc>>,
    /// Backend reported that it has no data for the sensor
    pub error: bool,
}

impl Snapshot {
    #[must_use]
    pub fn errored() -> Self {
        Self {
            error: true,
            ..Self::default()
        }
    }

    /// Whether the reading is fresh enough to count as online.
    #[must_use]
    pub fn liveness(&self, now: DateTime<Utc>, threshold: Duration) -> Liveness {
        match (self.error, self.timestamp) {
            (false, Some(ts)) if now - ts < threshold => Liveness::Online,
            (false, Some(ts)) => Liveness::Offline { since: ts },
            _ => Liveness::NoData,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Online,
    Offline { since: DateTime<Utc> },
    NoData,
}

impl Liveness {
    #[must_use]
    pub fn alert(self) -> AlertState {
        match self {
            Self::Online => AlertState::Good,
            Self::Offline { .. } | Self::NoData => AlertState::Bad,
        }
    }
}

/// Update `tile` from a freshly fetched snapshot.
pub fn apply_snapshot<Tz: TimeZone>(
    tile: &mut Tile,
    sensor: &SensorDescriptor,
    snapshot: &Snapshot,
    now: DateTime<Utc>,
    threshold: Duration,
    tz: &Tz,
) -> Liveness
where
    Tz::Offset: std::fmt::Display,
{
    let liveness = snapshot.liveness(now, threshold);
    tile.alert = liveness.alert();

    match liveness {
        Liveness::NoData => {
            tile.reading = NO_DATA_TEXT.to_string();
            tile.in_range = None;
            return liveness;
        }
        Liveness::Online => {
            tile.reading = sensor.profile.reading_text(snapshot);
            tile.in_range = match (sensor.comfort, snapshot.temperature, snapshot.humidity) {
                (Some(range), Some(t), Some(h)) => Some(range.contains(t, h)),
                _ => None,
            };
        }
        Liveness::Offline { since } => {
            tile.reading = format!("Offline since {}", format_full(since, tz));
            tile.in_range = None;
        }
    }

    if let Some(ts) = snapshot.timestamp {
        tile.last_updated = Some(format!("Last updated: {}", format_full(ts, tz)));
    }

    liveness
}

/// Mark `tile` as unreachable after a failed fetch. The last-updated label is kept.
pub fn apply_unreachable(tile: &mut Tile) {
    tile.alert = AlertState::Bad;
    tile.reading = UNREACHABLE_TEXT.to_string();
    tile.in_range = None;
}
