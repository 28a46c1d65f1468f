use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::AppState;
use crate::error::{AppError, AppResult};
use crate::popup::{PopupView, RenderTicket};
use crate::series::{DayFilter, Scale};

#[derive(Debug, Deserialize, ToSchema)]
pub struct OpenPopupRequest {
    pub sensor_id: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePopupRequest {
    /// New lookback window (kept if omitted)
    #[serde(default)]
    pub scale: Option<Scale>,
    /// New day/night filter (kept if omitted)
    #[serde(default)]
    pub filter: Option<DayFilter>,
}

async fn render(state: &AppState, ticket: RenderTicket) -> AppResult<PopupView> {
    let series = state.backend.fetch_series(&ticket.sensor_id).await?;
    state
        .popups
        .complete(&ticket, &series, Utc::now(), &state.display_offset)
        .await
}

/// Open a detail popup
///
/// Starts a fresh session with the hourly, unfiltered window and returns its first chart.
#[utoipa::path(
    post,
    path = "/api/popups",
    request_body = OpenPopupRequest,
    responses(
        (status = 201, description = "Popup opened", body = PopupView),
        (status = 400, description = "Sensor is a placeholder"),
        (status = 404, description = "Sensor not found"),
        (status = 502, description = "Sensor backend unavailable"),
    ),
    tag = "popups"
)]
pub async fn open_popup(
    State(state): State<AppState>,
    Json(request): Json<OpenPopupRequest>,
) -> AppResult<(StatusCode, Json<PopupView>)> {
    let Some(sensor) = state.registry.find(&request.sensor_id) else {
        if state.registry.is_placeholder(&request.sensor_id) {
            return Err(AppError::BadRequest(format!(
                "Sensor '{}' has no data source yet",
                request.sensor_id
            )));
        }
        return Err(AppError::NotFound(format!(
            "Sensor '{}' not found",
            request.sensor_id
        )));
    };

    let ticket = state.popups.open(sensor.clone()).await;
    let view = render(&state, ticket).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Change a popup's window
///
/// Re-renders the chart. A request overtaken by a newer one for the same popup answers 409.
#[utoipa::path(
    patch,
    path = "/api/popups/{session_id}",
    params(
        ("session_id" = Uuid, Path, description = "Popup session id"),
    ),
    request_body = UpdatePopupRequest,
    responses(
        (status = 200, description = "Popup re-rendered", body = PopupView),
        (status = 404, description = "Popup not found or expired"),
        (status = 409, description = "Superseded by a newer request"),
        (status = 502, description = "Sensor backend unavailable"),
    ),
    tag = "popups"
)]
pub async fn update_popup(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<UpdatePopupRequest>,
) -> AppResult<Json<PopupView>> {
    let ticket = state
        .popups
        .request(session_id, request.scale, request.filter)
        .await?;
    Ok(Json(render(&state, ticket).await?))
}

/// Close a popup
#[utoipa::path(
    delete,
    path = "/api/popups/{session_id}",
    params(
        ("session_id" = Uuid, Path, description = "Popup session id"),
    ),
    responses(
        (status = 204, description = "Popup closed"),
        (status = 404, description = "Popup not found or expired"),
    ),
    tag = "popups"
)]
pub async fn close_popup(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.popups.close(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
