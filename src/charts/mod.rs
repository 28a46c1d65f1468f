//! Declarative chart descriptions handed to the browser's charting library.
//!
//! A chart is never patched: every refresh builds a new [`ChartConfig`] and
//! [`ChartSlot::replace`] discards whatever the slot held before.

mod build;

pub use build::{mini_chart, placeholder_chart, popup_chart};

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    /// One value per label; `null` leaves a gap in the line
    pub data: Vec<Option<f64>>,
    pub border_color: String,
    pub fill: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YAxis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl YAxis {
    #[must_use]
    pub fn is_auto(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub legend: bool,
    pub y_axis: YAxis,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    /// Chart type understood by the renderer
    pub kind: String,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub options: ChartOptions,
}

impl ChartConfig {
    #[must_use]
    pub fn line(labels: Vec<String>, datasets: Vec<Dataset>, options: ChartOptions) -> Self {
        Self {
            kind: "line".to_string(),
            labels,
            datasets,
            options,
        }
    }

    #[must_use]
    pub fn dataset(&self, label: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.label == label)
    }
}

/// A live chart: the configuration it was drawn from plus a revision that
/// changes every time the chart is recreated.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChartHandle {
    pub revision: u64,
    pub config: ChartConfig,
}

/// The drawing surface a chart is bound to.
#[derive(Debug, Default)]
pub struct ChartSlot {
    current: Option<ChartHandle>,
    revisions: u64,
}

impl ChartSlot {
    /// Destroy the bound chart (if any) and bind a new one built from `config`.
    pub fn replace(&mut self, config: ChartConfig) -> &ChartHandle {
        self.destroy();
        self.revisions += 1;
        self.current.insert(ChartHandle {
            revision: self.revisions,
            config,
        })
    }

    /// Release the bound chart. Returns whether there was one.
    pub fn destroy(&mut self) -> bool {
        match self.current.take() {
            Some(old) => {
                tracing::trace!(revision = old.revision, "Chart destroyed");
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&ChartHandle> {
        self.current.as_ref()
    }

    /// Number of charts ever bound to this slot.
    #[must_use]
    pub fn revisions(&self) -> u64 {
        self.revisions
    }
}
