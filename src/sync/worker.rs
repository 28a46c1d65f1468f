use chrono::Utc;
use futures::future::join_all;

use crate::charts::mini_chart;
use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::registry::SensorDescriptor;
use crate::tiles::{Liveness, apply_snapshot, apply_unreachable};

/// What happened to one sensor during a refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Snapshot and mini chart both updated
    Refreshed,
    /// At least one of the two fetches failed
    Failed,
    /// The previous refresh for this sensor was still running
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub refreshed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Refresh every real sensor concurrently. Placeholders are never fetched.
pub async fn refresh_all(state: &AppState) -> RefreshSummary {
    let outcomes = join_all(
        state
            .registry
            .sensors()
            .iter()
            .map(|sensor| refresh_sensor(state, sensor)),
    )
    .await;

    let mut summary = RefreshSummary::default();
    for outcome in outcomes {
        match outcome {
            RefreshOutcome::Refreshed => summary.refreshed += 1,
            RefreshOutcome::Failed => summary.failed += 1,
            RefreshOutcome::Skipped => summary.skipped += 1,
        }
    }
    summary
}

/// Refresh one sensor's tile text and mini chart, unless a refresh for it is
/// already outstanding.
pub async fn refresh_sensor(state: &AppState, sensor: &SensorDescriptor) -> RefreshOutcome {
    let Some(_guard) = state.in_flight.try_claim(sensor.id) else {
        tracing::debug!(sensor_id = sensor.id, "Previous refresh still in flight, skipping");
        return RefreshOutcome::Skipped;
    };

    let (snapshot, chart) = tokio::join!(
        refresh_snapshot(state, sensor),
        refresh_mini_chart(state, sensor)
    );

    match (snapshot, chart) {
        (Ok(liveness), Ok(points)) => {
            tracing::trace!(sensor_id = sensor.id, ?liveness, points, "Sensor refreshed");
            RefreshOutcome::Refreshed
        }
        (snapshot, chart) => {
            if let Err(e) = snapshot {
                tracing::warn!(sensor_id = sensor.id, error = %e, "Snapshot refresh failed");
            }
            if let Err(e) = chart {
                tracing::warn!(sensor_id = sensor.id, error = %e, "Mini chart refresh failed");
            }
            RefreshOutcome::Failed
        }
    }
}

/// Fetch the latest reading and apply it to the sensor's tile.
///
/// On a transport or decode failure the tile is marked unreachable rather
/// than left showing stale data.
///
/// # Errors
///
/// Returns the backend error after marking the tile, or `AppError::NotFound`
/// if the sensor has no tile.
pub async fn refresh_snapshot(state: &AppState, sensor: &SensorDescriptor) -> AppResult<Liveness> {
    let result = state.backend.get_snapshot(sensor.id).await;
    let now = Utc::now();

    let mut board = state.board.write().await;
    let tile = board
        .get_mut(sensor.id)
        .ok_or_else(|| AppError::NotFound(format!("No tile for sensor '{}'", sensor.id)))?;

    match result {
        Ok(snapshot) => {
            let liveness = apply_snapshot(
                tile,
                sensor,
                &snapshot,
                now,
                state.config.liveness_threshold(),
                &state.display_offset,
            );
            if let Liveness::Offline { since } = liveness {
                tracing::debug!(sensor_id = sensor.id, %since, "Sensor offline");
            }
            Ok(liveness)
        }
        Err(e) => {
            apply_unreachable(tile);
            Err(e)
        }
    }
}

/// Redraw the sensor's mini chart from the most recent log rows. Only the
/// tail of the log is decoded.
///
/// On failure the previous chart stays in place.
///
/// # Errors
///
/// Returns the backend error if the log cannot be fetched, or
/// `AppError::NotFound` if the sensor has no tile.
pub async fn refresh_mini_chart(state: &AppState, sensor: &SensorDescriptor) -> AppResult<usize> {
    let recent = state
        .backend
        .fetch_recent_series(sensor.id, state.config.mini_chart_points)
        .await?;
    let config = mini_chart(&recent, sensor.profile, &state.display_offset);

    let mut board = state.board.write().await;
    let tile = board
        .get_mut(sensor.id)
        .ok_or_else(|| AppError::NotFound(format!("No tile for sensor '{}'", sensor.id)))?;
    tile.chart.replace(config);

    Ok(recent.len())
}
