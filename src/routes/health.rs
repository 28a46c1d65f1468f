use axum::http::StatusCode;

/// Health check endpoint
///
/// Returns 200 OK while the service runs, regardless of whether the sensor
/// backend is reachable. Not rate-limited.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "health"
)]
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
