pub mod dashboard;
pub mod health;
pub mod popups;
mod rate_limit;
pub mod tiles;

use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};

use rate_limit::ViewerIpKeyExtractor;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::error::{AppError, AppResult};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        tiles::list_sensors,
        tiles::list_tiles,
        tiles::get_tile,
        popups::open_popup,
        popups::update_popup,
        popups::close_popup,
    ),
    components(
        schemas(
            tiles::SensorResponse,
            tiles::ComfortResponse,
            crate::tiles::TileView,
            crate::tiles::AlertState,
            crate::registry::MetricProfile,
            crate::charts::ChartHandle,
            crate::charts::ChartConfig,
            crate::charts::Dataset,
            crate::charts::ChartOptions,
            crate::charts::YAxis,
            popups::OpenPopupRequest,
            popups::UpdatePopupRequest,
            crate::popup::PopupView,
            crate::series::Scale,
            crate::series::DayFilter,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sensors", description = "Registered sensors"),
        (name = "tiles", description = "Dashboard tiles with live readings and mini charts"),
        (name = "popups", description = "Detail popups with windowed history"),
    ),
    info(
        title = "Terrarium Dashboard API",
        description = "Live sensor tiles and windowed history charts",
        version = "0.1.0"
    )
)]
struct ApiDoc;

/// Build the service router.
///
/// # Errors
///
/// Returns `AppError::Internal` if a rate limiter cannot be built from the
/// configured rates.
pub fn build_router(state: AppState) -> AppResult<Router> {
    let config = &state.config;

    if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
    } else {
        tracing::info!(
            read_rate = %format!("{}/s burst {}", config.rate_limit_read_per_second, config.rate_limit_read_burst),
            popup_rate = %format!("{}/s burst {}", config.rate_limit_popup_per_second, config.rate_limit_popup_burst),
            "Rate limiting configured"
        );
    }

    // Tile reads are served from memory
    let read_routes_base = Router::new()
        .route("/sensors", get(tiles::list_sensors))
        .route("/tiles", get(tiles::list_tiles))
        .route("/tiles/{sensor_id}", get(tiles::get_tile));

    // Every popup render pulls the full sensor log from the backend
    let popup_routes_base = Router::new()
        .route("/popups", post(popups::open_popup))
        .route(
            "/popups/{session_id}",
            patch(popups::update_popup).delete(popups::close_popup),
        );

    let api_routes = if config.disable_rate_limiting {
        Router::new()
            .merge(read_routes_base)
            .merge(popup_routes_base)
    } else {
        let read_limiter = GovernorConfigBuilder::default()
            .key_extractor(ViewerIpKeyExtractor)
            .per_second(config.rate_limit_read_per_second)
            .burst_size(config.rate_limit_read_burst)
            .finish()
            .ok_or_else(|| AppError::Internal("Invalid read rate limit".to_string()))?;

        let popup_limiter = GovernorConfigBuilder::default()
            .key_extractor(ViewerIpKeyExtractor)
            .per_second(config.rate_limit_popup_per_second)
            .burst_size(config.rate_limit_popup_burst)
            .finish()
            .ok_or_else(|| AppError::Internal("Invalid popup rate limit".to_string()))?;

        Router::new()
            .merge(read_routes_base.layer(GovernorLayer {
                config: Arc::new(read_limiter),
            }))
            .merge(popup_routes_base.layer(GovernorLayer {
                config: Arc::new(popup_limiter),
            }))
    }
    .layer(RequestBodyLimitLayer::new(16 * 1024)); // popup requests are tiny

    // Dashboard page and health check (NO rate limiting)
    let page_routes = Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Ok(Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
