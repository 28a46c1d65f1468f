//! Static catalogue of the sensors shown on the dashboard.
//!
//! Real sensors are polled; placeholders only ever get a decorative tile.
//! Everything that depends on the physical quantity a sensor reports goes
//! through its [`MetricProfile`], never through its id.

use serde::Serialize;
use utoipa::ToSchema;

use crate::series::SeriesPoint;
use crate::tiles::Snapshot;

/// A quantity that can be plotted as one chart dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Temperature,
    Humidity,
    Lux,
    Tds,
}

impl Metric {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temp (°F)",
            Self::Humidity => "Humidity (%)",
            Self::Lux => "Lux (lx)",
            Self::Tds => "TDS (ppm)",
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Temperature => "orange",
            Self::Humidity => "lightblue",
            Self::Lux => "yellow",
            Self::Tds => "green",
        }
    }

    #[must_use]
    pub fn value(self, point: &SeriesPoint) -> Option<f64> {
        match self {
            Self::Temperature => point.temperature,
            Self::Humidity => point.humidity,
            Self::Lux => point.lux,
            Self::Tds => point.tds,
        }
    }
}

/// What a sensor measures and how it is charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetricProfile {
    /// Air temperature and relative humidity, optionally lux/TDS columns.
    Climate,
    /// Total dissolved solids in water.
    WaterQuality,
}

const TDS_RANGE: (f64, f64) = (0.0, 500.0);

impl MetricProfile {
    /// Datasets drawn on the tile's mini chart.
    #[must_use]
    pub fn mini_metrics(self) -> &'static [Metric] {
        match self {
            Self::Climate => &[Metric::Temperature, Metric::Humidity],
            Self::WaterQuality => &[Metric::Tds],
        }
    }

    /// Datasets drawn in the popup, given which optional columns the series carries.
    #[must_use]
    pub fn popup_metrics(self, has_lux: bool, has_tds: bool) -> Vec<Metric> {
        match self {
            Self::Climate => {
                let mut metrics = vec![Metric::Temperature, Metric::Humidity];
                if has_lux {
                    metrics.push(Metric::Lux);
                }
                if has_tds {
                    metrics.push(Metric::Tds);
                }
                metrics
            }
            Self::WaterQuality => vec![Metric::Tds],
        }
    }

    /// Fixed y-axis bounds, or `None` for an auto-ranged axis.
    #[must_use]
    pub fn fixed_range(self) -> Option<(f64, f64)> {
        match self {
            Self::Climate => None,
            Self::WaterQuality => Some(TDS_RANGE),
        }
    }

    /// Y-axis title for the popup chart.
    #[must_use]
    pub fn axis_title(self) -> Option<&'static str> {
        match self {
            Self::Climate => None,
            Self::WaterQuality => Some(Metric::Tds.label()),
        }
    }

    /// Live reading line for an online sensor.
    #[must_use]
    pub fn reading_text(self, snapshot: &Snapshot) -> String {
        match self {
            Self::Climate => format!(
                "Temp: {}°F | Humidity: {}%",
                one_decimal(snapshot.temperature),
                one_decimal(snapshot.humidity)
            ),
            // The backend omits TDS when the probe reports nothing
            Self::WaterQuality => format!("TDS: {:.1} ppm", snapshot.tds.unwrap_or(0.0)),
        }
    }
}

fn one_decimal(value: Option<f64>) -> String {
    value.map_or_else(|| "--".to_string(), |v| format!("{v:.1}"))
}

/// Acceptable husbandry range for a climate sensor (inclusive bounds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComfortRange {
    pub temperature: (f64, f64),
    pub humidity: (f64, f64),
}

impl ComfortRange {
    #[must_use]
    pub fn contains(&self, temperature: f64, humidity: f64) -> bool {
        (self.temperature.0..=self.temperature.1).contains(&temperature)
            && (self.humidity.0..=self.humidity.1).contains(&humidity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SensorDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub profile: MetricProfile,
    pub comfort: Option<ComfortRange>,
}

impl SensorDescriptor {
    const fn climate(id: &'static str, label: &'static str, comfort: Option<ComfortRange>) -> Self {
        Self {
            id,
            label,
            profile: MetricProfile::Climate,
            comfort,
        }
    }

    const fn placeholder(id: &'static str, label: &'static str) -> Self {
        Self::climate(id, label, None)
    }
}

const fn comfort(temperature: (f64, f64), humidity: (f64, f64)) -> Option<ComfortRange> {
    Some(ComfortRange {
        temperature,
        humidity,
    })
}

const ROOM: Option<ComfortRange> = comfort((60.0, 85.0), (20.0, 60.0));

const SENSORS: [SensorDescriptor; 9] = [
    SensorDescriptor::climate(
        "whites",
        "Whites Tree Frog Terrarium",
        comfort((70.0, 85.0), (50.0, 80.0)),
    ),
    SensorDescriptor::climate(
        "green",
        "Green Tree Frog Terrarium",
        comfort((72.0, 85.0), (50.0, 80.0)),
    ),
    SensorDescriptor::climate("office", "Office Sensor", None),
    SensorDescriptor {
        id: "aquarium",
        label: "Aquarium Water Sensor",
        profile: MetricProfile::WaterQuality,
        comfort: None,
    },
    SensorDescriptor::climate(
        "red knee",
        "Red Knee Tarantula",
        comfort((75.0, 80.0), (60.0, 70.0)),
    ),
    SensorDescriptor::climate(
        "avicularia avicularia",
        "Avicularia Avicularia Tarantula",
        comfort((75.0, 85.0), (70.0, 80.0)),
    ),
    SensorDescriptor::climate("living room", "Living Room", ROOM),
    SensorDescriptor::climate("bedroom", "Bedroom", ROOM),
    SensorDescriptor::climate("3d printer", "3D Printer", None),
];

const PLACEHOLDERS: [SensorDescriptor; 3] = [
    SensorDescriptor::placeholder("coming-1", "Coming Soon 1"),
    SensorDescriptor::placeholder("coming-2", "Coming Soon 2"),
    SensorDescriptor::placeholder("coming-3", "Coming Soon 3"),
];

#[derive(Debug, Clone)]
pub struct Registry {
    sensors: Vec<SensorDescriptor>,
    placeholders: Vec<SensorDescriptor>,
}

impl Registry {
    #[must_use]
    pub fn new(sensors: Vec<SensorDescriptor>, placeholders: Vec<SensorDescriptor>) -> Self {
        Self {
            sensors,
            placeholders,
        }
    }

    /// The sensors deployed around the house.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(SENSORS.to_vec(), PLACEHOLDERS.to_vec())
    }

    #[must_use]
    pub fn sensors(&self) -> &[SensorDescriptor] {
        &self.sensors
    }

    #[must_use]
    pub fn placeholders(&self) -> &[SensorDescriptor] {
        &self.placeholders
    }

    /// Look up a real (polled) sensor.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&SensorDescriptor> {
        self.sensors.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn is_placeholder(&self, id: &str) -> bool {
        self.placeholders.iter().any(|s| s.id == id)
    }
}
