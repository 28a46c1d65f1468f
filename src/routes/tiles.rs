use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::registry::{MetricProfile, SensorDescriptor};
use crate::tiles::TileView;

#[derive(Debug, Serialize, ToSchema)]
pub struct ComfortResponse {
    pub temperature_min: f64,
    pub temperature_max: f64,
    pub humidity_min: f64,
    pub humidity_max: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SensorResponse {
    pub id: String,
    pub label: String,
    pub profile: MetricProfile,
    pub placeholder: bool,
    pub comfort: Option<ComfortResponse>,
}

impl SensorResponse {
    fn from_descriptor(sensor: &SensorDescriptor, placeholder: bool) -> Self {
        Self {
            id: sensor.id.to_string(),
            label: sensor.label.to_string(),
            profile: sensor.profile,
            placeholder,
            comfort: sensor.comfort.map(|c| ComfortResponse {
                temperature_min: c.temperature.0,
                temperature_max: c.temperature.1,
                humidity_min: c.humidity.0,
                humidity_max: c.humidity.1,
            }),
        }
    }
}

/// List registered sensors
///
/// Real sensors first, then "coming soon" placeholders.
#[utoipa::path(
    get,
    path = "/api/sensors",
    responses(
        (status = 200, description = "Sensors retrieved successfully", body = Vec<SensorResponse>),
    ),
    tag = "sensors"
)]
pub async fn list_sensors(State(state): State<AppState>) -> Json<Vec<SensorResponse>> {
    let registry = &state.registry;
    let response = registry
        .sensors()
        .iter()
        .map(|s| SensorResponse::from_descriptor(s, false))
        .chain(
            registry
                .placeholders()
                .iter()
                .map(|s| SensorResponse::from_descriptor(s, true)),
        )
        .collect();

    Json(response)
}

/// List all dashboard tiles
#[utoipa::path(
    get,
    path = "/api/tiles",
    responses(
        (status = 200, description = "Tiles retrieved successfully", body = Vec<TileView>),
    ),
    tag = "tiles"
)]
pub async fn list_tiles(State(state): State<AppState>) -> Json<Vec<TileView>> {
    Json(state.board.read().await.view())
}

/// Get one dashboard tile
#[utoipa::path(
    get,
    path = "/api/tiles/{sensor_id}",
    params(
        ("sensor_id" = String, Path, description = "Sensor id, e.g. `whites` or `red knee`"),
    ),
    responses(
        (status = 200, description = "Tile retrieved successfully", body = TileView),
        (status = 404, description = "Sensor not found"),
    ),
    tag = "tiles"
)]
pub async fn get_tile(
    State(state): State<AppState>,
    Path(sensor_id): Path<String>,
) -> AppResult<Json<TileView>> {
    state
        .board
        .read()
        .await
        .get(&sensor_id)
        .map(|tile| Json(tile.view()))
        .ok_or_else(|| AppError::NotFound(format!("Sensor '{sensor_id}' not found")))
}
