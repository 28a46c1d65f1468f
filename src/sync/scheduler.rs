use tokio::time::interval;

use crate::common::AppState;
use crate::sync::worker;

/// Run the tile refresh task on a schedule.
///
/// Every tick starts a refresh cycle without waiting for the previous one;
/// sensors whose last refresh is still outstanding are skipped by the
/// in-flight guard.
pub async fn run_tile_refresh(state: AppState) {
    let period = state.config.refresh_interval();

    tracing::info!(
        interval_secs = period.as_secs(),
        sensors = state.registry.sensors().len(),
        placeholders = state.registry.placeholders().len(),
        "Starting tile refresh scheduler"
    );

    let mut ticker = interval(period);

    loop {
        // First tick completes immediately
        ticker.tick().await;

        let cycle_state = state.clone();
        tokio::spawn(async move {
            let summary = worker::refresh_all(&cycle_state).await;
            if summary.failed > 0 {
                tracing::warn!(
                    refreshed = summary.refreshed,
                    failed = summary.failed,
                    skipped = summary.skipped,
                    "Tile refresh cycle finished with failures"
                );
            } else {
                tracing::debug!(
                    refreshed = summary.refreshed,
                    skipped = summary.skipped,
                    "Tile refresh cycle finished"
                );
            }
        });
    }
}
