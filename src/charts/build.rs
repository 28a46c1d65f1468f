use chrono::TimeZone;

use super::{ChartConfig, ChartOptions, Dataset, YAxis};
use crate::registry::{Metric, MetricProfile};
use crate::series::TimeSeries;
use crate::series::time::{format_clock, format_full};

const PLACEHOLDER_POINTS: usize = 10;
const PLACEHOLDER_COLORS: [&str; 2] = ["#444", "#555"];

fn dataset(metric: Metric, series: &TimeSeries) -> Dataset {
    Dataset {
        label: metric.label().to_string(),
        data: series.iter().map(|p| metric.value(p)).collect(),
        border_color: metric.color().to_string(),
        fill: false,
        border_dash: None,
    }
}

fn y_axis(profile: MetricProfile, titled: bool) -> YAxis {
    let (min, max) = profile
        .fixed_range()
        .map_or((None, None), |(lo, hi)| (Some(lo), Some(hi)));
    YAxis {
        min,
        max,
        title: if titled {
            profile.axis_title().map(str::to_string)
        } else {
            None
        },
    }
}

/// Tile chart for the most recent readings.
pub fn mini_chart<Tz: TimeZone>(series: &TimeSeries, profile: MetricProfile, tz: &Tz) -> ChartConfig
where
    Tz::Offset: std::fmt::Display,
{
    let labels = series
        .iter()
        .map(|p| format_clock(p.timestamp, tz))
        .collect();
    let datasets = profile
        .mini_metrics()
        .iter()
        .map(|&m| dataset(m, series))
        .collect();

    ChartConfig::line(
        labels,
        datasets,
        ChartOptions {
            legend: false,
            y_axis: y_axis(profile, false),
        },
    )
}

/// Detail chart for an already windowed series.
pub fn popup_chart<Tz: TimeZone>(series: &TimeSeries, profile: MetricProfile, tz: &Tz) -> ChartConfig
where
    Tz::Offset: std::fmt::Display,
{
    let labels = series
        .iter()
        .map(|p| format_full(p.timestamp, tz))
        .collect();
    let datasets = profile
        .popup_metrics(series.has_lux(), series.has_tds())
        .into_iter()
        .map(|m| dataset(m, series))
        .collect();

    ChartConfig::line(
        labels,
        datasets,
        ChartOptions {
            legend: true,
            y_axis: y_axis(profile, true),
        },
    )
}

/// Flat dashed lines for a sensor slot that has no data source yet.
#[must_use]
pub fn placeholder_chart() -> ChartConfig {
    let datasets = PLACEHOLDER_COLORS
        .iter()
        .map(|color| Dataset {
            label: String::new(),
            data: vec![None; PLACEHOLDER_POINTS],
            border_color: (*color).to_string(),
            fill: false,
            border_dash: Some(vec![5, 5]),
        })
        .collect();

    ChartConfig::line(
        vec!["T".to_string(); PLACEHOLDER_POINTS],
        datasets,
        ChartOptions::default(),
    )
}
