//! Historical sensor readings: decoding the backend log and windowing it for charts.

pub mod decode;
pub mod time;
pub mod window;

use chrono::{DateTime, Utc};

pub use decode::{decode_log, tail_rows};
pub use window::{DayFilter, DisplayWindow, Scale, window_series};

/// One decoded row of a sensor log.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub lux: Option<f64>,
    pub tds: Option<f64>,
}

/// Readings in log order (ascending time is assumed, never enforced).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    points: Vec<SeriesPoint>,
}

impl TimeSeries {
    #[must_use]
    pub fn new(points: Vec<SeriesPoint>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SeriesPoint> {
        self.points.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent `n` points, in order.
    #[must_use]
    pub fn tail(&self, n: usize) -> Self {
        let start = self.points.len().saturating_sub(n);
        Self::new(self.points[start..].to_vec())
    }

    #[must_use]
    pub fn has_lux(&self) -> bool {
        self.points.iter().any(|p| p.lux.is_some())
    }

    #[must_use]
    pub fn has_tds(&self) -> bool {
        self.points.iter().any(|p| p.tds.is_some())
    }

    #[must_use]
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|p| p.timestamp)
    }
}

impl FromIterator<SeriesPoint> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = SeriesPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a SeriesPoint;
    type IntoIter = std::slice::Iter<'a, SeriesPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
