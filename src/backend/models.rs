use chrono::TimeZone;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::series::time::{parse_instant, parse_lenient_f64};
use crate::tiles::Snapshot;

/// Response from `/sensor/{id}`
///
/// The logger stores readings as text, so numeric fields arrive either as
/// JSON numbers or as numeric strings (possibly empty).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotResponse {
    #[serde(default, deserialize_with = "lenient_number")]
    pub temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub lux: Option<f64>,
    /// Older probes report `TDS` in capitals
    #[serde(default, alias = "TDS", deserialize_with = "lenient_number")]
    pub tds: Option<f64>,
    #[serde(default)]
    pub time: Option<Value>,
    /// Display name echoed by the backend
    #[serde(default)]
    pub sensor: Option<String>,
    /// `true` or a message such as `"no data"` when the backend has nothing
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl SnapshotResponse {
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.as_ref().is_some_and(truthy)
    }

    /// Convert into a domain snapshot, resolving naive times in `tz`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Backend` if a non-error response has no readable time.
    pub fn into_snapshot<Tz: TimeZone>(self, tz: &Tz) -> AppResult<Snapshot> {
        if self.is_error() {
            return Ok(Snapshot::errored());
        }

        let timestamp = match &self.time {
            Some(Value::String(raw)) => parse_instant(raw, tz),
            _ => None,
        }
        .ok_or_else(|| {
            AppError::Backend(format!("Snapshot has no readable time: {:?}", self.time))
        })?;

        Ok(Snapshot {
            temperature: self.temp,
            humidity: self.humidity,
            lux: self.lux,
            tds: self.tds,
            timestamp: Some(timestamp),
            error: false,
        })
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(Value::String(s)) => parse_lenient_f64(&s),
        _ => None,
    })
}
