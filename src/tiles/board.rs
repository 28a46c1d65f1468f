use serde::Serialize;
use utoipa::ToSchema;

use crate::charts::{ChartHandle, ChartSlot, placeholder_chart};
use crate::registry::{MetricProfile, Registry, SensorDescriptor};

pub const LOADING_TEXT: &str = "Loading...";

/// Tri-state status dot on a tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertState {
    #[default]
    Unknown,
    Good,
    Bad,
}

#[derive(Debug)]
pub struct Tile {
    pub sensor_id: String,
    pub label: String,
    pub profile: MetricProfile,
    pub placeholder: bool,
    pub alert: AlertState,
    pub reading: String,
    pub last_updated: Option<String>,
    /// Whether the live climate reading sits inside the sensor's comfort range
    pub in_range: Option<bool>,
    pub chart: ChartSlot,
}

impl Tile {
    fn new(sensor: &SensorDescriptor, placeholder: bool) -> Self {
        Self {
            sensor_id: sensor.id.to_string(),
            label: sensor.label.to_string(),
            profile: sensor.profile,
            placeholder,
            alert: AlertState::Unknown,
            reading: LOADING_TEXT.to_string(),
            last_updated: None,
            in_range: None,
            chart: ChartSlot::default(),
        }
    }

    #[must_use]
    pub fn view(&self) -> TileView {
        TileView {
            sensor_id: self.sensor_id.clone(),
            label: self.label.clone(),
            profile: self.profile,
            placeholder: self.placeholder,
            alert: self.alert,
            reading: self.reading.clone(),
            last_updated: self.last_updated.clone(),
            in_range: self.in_range,
            chart: self.chart.current().cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TileView {
    pub sensor_id: String,
    pub label: String,
    pub profile: MetricProfile,
    pub placeholder: bool,
    pub alert: AlertState,
    pub reading: String,
    pub last_updated: Option<String>,
    pub in_range: Option<bool>,
    pub chart: Option<ChartHandle>,
}

/// All tiles in display order: real sensors first, then placeholders.
#[derive(Debug)]
pub struct TileBoard {
    tiles: Vec<Tile>,
}

impl TileBoard {
    /// Lay out one tile per registry entry. Placeholders get their decorative
    /// chart here and are never touched again.
    #[must_use]
    pub fn build(registry: &Registry) -> Self {
        let real = registry.sensors().iter().map(|s| Tile::new(s, false));
        let placeholders = registry.placeholders().iter().map(|s| {
            let mut tile = Tile::new(s, true);
            tile.chart.replace(placeholder_chart());
            tile
        });

        let tiles: Vec<Tile> = real.chain(placeholders).collect();
        tracing::debug!(tiles = tiles.len(), "Tile board built");
        Self { tiles }
    }

    #[must_use]
    pub fn get(&self, sensor_id: &str) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.sensor_id == sensor_id)
    }

    /// Mutable access to a polled sensor's tile. Placeholders are not returned.
    pub fn get_mut(&mut self, sensor_id: &str) -> Option<&mut Tile> {
        self.tiles
            .iter_mut()
            .find(|t| t.sensor_id == sensor_id && !t.placeholder)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[must_use]
    pub fn view(&self) -> Vec<TileView> {
        self.tiles.iter().map(Tile::view).collect()
    }
}
