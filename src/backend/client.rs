use chrono::FixedOffset;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

use crate::backend::models::SnapshotResponse;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::series::{TimeSeries, decode_log, tail_rows};
use crate::tiles::Snapshot;

/// Extra raw lines read when tailing a log, covering rows that fail to decode.
const RECENT_ROW_MARGIN: usize = 10;

pub struct BackendClient {
    http_client: Client,
    base_url: Url,
    tz: FixedOffset,
}

impl BackendClient {
    /// # Errors
    ///
    /// Returns `AppError::Config` for an unusable display offset and
    /// `AppError::Internal` if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.sensor_request_timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        let base_url = Url::parse(&config.sensor_base_url).map_err(|e| {
            AppError::Internal(format!(
                "Invalid sensor base URL '{}': {e}",
                config.sensor_base_url
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Internal(format!(
                "Sensor base URL '{}' cannot carry a path",
                config.sensor_base_url
            )));
        }

        Ok(Self {
            http_client,
            base_url,
            tz: config.display_offset()?,
        })
    }

    /// `{base}/sensor/{segment}` with the segment percent-encoded
    /// (sensor ids such as "red knee" contain spaces).
    #[must_use]
    pub fn endpoint(&self, segment: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("sensor").push(segment);
        }
        url
    }

    /// Get the latest reading for a sensor.
    ///
    /// An explicit error body is honoured even on a non-success status, since
    /// the backend answers "no data" with a 404 and a JSON error flag.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Backend` if the request fails, the status is an
    /// error without an error body, or the body cannot be decoded.
    pub async fn get_snapshot(&self, sensor_id: &str) -> AppResult<Snapshot> {
        let url = self.endpoint(sensor_id);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("Request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::Backend("Rate limited (429)".to_string()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::Backend(format!("Failed to get response text: {e}")))?;

        let parsed: Result<SnapshotResponse, _> = serde_json::from_str(&text);

        match parsed {
            Ok(body) if status.is_success() || body.is_error() => body.into_snapshot(&self.tz),
            Ok(_) => Err(AppError::Backend(format!("HTTP {status}: {text}"))),
            Err(e) if status.is_success() => {
                tracing::error!(
                    sensor_id,
                    error = %e,
                    body_preview = %text.chars().take(200).collect::<String>(),
                    "Failed to parse snapshot response"
                );
                Err(AppError::Backend(format!("Failed to parse response: {e}")))
            }
            Err(_) => Err(AppError::Backend(format!("HTTP {status}: {text}"))),
        }
    }

    /// Get the raw history log for a sensor.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Backend` if the request fails or returns an error status.
    pub async fn get_log(&self, sensor_id: &str) -> AppResult<String> {
        let url = self.endpoint(&format!("{sensor_id}-log"));

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Backend(format!("Request failed: {e}")))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::Backend("Rate limited (429)".to_string()));
        }

        if !response.status().is_success() {
            return Err(AppError::Backend(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Backend(format!("Failed to get response text: {e}")))
    }

    /// Fetch and decode the full history of a sensor.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Backend` if the log cannot be fetched.
    pub async fn fetch_series(&self, sensor_id: &str) -> AppResult<TimeSeries> {
        let body = self.get_log(sensor_id).await?;
        let series = decode_log(&body, &self.tz);
        tracing::debug!(sensor_id, points = series.len(), "Fetched sensor series");
        Ok(series)
    }

    /// Fetch the log and decode only its most recent `points` readings.
    ///
    /// Raw lines are tailed before decoding, with a margin for rows that do
    /// not decode.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Backend` if the log cannot be fetched.
    pub async fn fetch_recent_series(
        &self,
        sensor_id: &str,
        points: usize,
    ) -> AppResult<TimeSeries> {
        let body = self.get_log(sensor_id).await?;
        let rows = points.saturating_add(RECENT_ROW_MARGIN);
        Ok(decode_log(tail_rows(&body, rows), &self.tz).tail(points))
    }

    #[must_use]
    pub fn display_offset(&self) -> FixedOffset {
        self.tz
    }
}
