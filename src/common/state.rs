use chrono::FixedOffset;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::backend::BackendClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::popup::PopupSessions;
use crate::registry::Registry;
use crate::tiles::TileBoard;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<Registry>,
    pub backend: Arc<BackendClient>,
    pub board: Arc<RwLock<TileBoard>>,
    pub popups: PopupSessions,
    pub in_flight: InFlight,
    pub display_offset: FixedOffset,
}

impl AppState {
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be built from `config`.
    pub fn new(config: Config, registry: Registry) -> AppResult<Self> {
        let backend = BackendClient::new(&config)?;
        let display_offset = backend.display_offset();

        // Tiles are laid out once, before the first fetch
        let board = TileBoard::build(&registry);

        let popups = PopupSessions::new(
            config.popup_session_max,
            Duration::from_secs(config.popup_session_idle_seconds),
        );

        Ok(Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            backend: Arc::new(backend),
            board: Arc::new(RwLock::new(board)),
            popups,
            in_flight: InFlight::default(),
            display_offset,
        })
    }
}

/// Sensors with a refresh currently outstanding.
#[derive(Clone, Default)]
pub struct InFlight {
    sensors: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    /// Claim `sensor_id`; `None` if a refresh for it is already running.
    /// The claim is released when the guard drops.
    #[must_use]
    pub fn try_claim(&self, sensor_id: &str) -> Option<InFlightGuard> {
        let mut sensors = self.sensors.lock().unwrap_or_else(PoisonError::into_inner);
        if !sensors.insert(sensor_id.to_string()) {
            return None;
        }
        Some(InFlightGuard {
            sensors: Arc::clone(&self.sensors),
            sensor_id: sensor_id.to_string(),
        })
    }

    #[must_use]
    pub fn is_claimed(&self, sensor_id: &str) -> bool {
        self.sensors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(sensor_id)
    }
}

pub struct InFlightGuard {
    sensors: Arc<Mutex<HashSet<String>>>,
    sensor_id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.sensors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.sensor_id);
    }
}
