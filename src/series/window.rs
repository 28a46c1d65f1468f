//! Popup windowing: lookback cutoff, day/night filter and minimum-spacing
//! decimation.
//!
//! Decimation drops points rather than combining them, so every emitted value
//! is a verbatim reading. The output is strictly increasing in time with
//! consecutive points at least [`Scale::spacing`] apart, which bounds the
//! number of plotted points regardless of how dense the log is.

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use super::TimeSeries;

/// Daylight hours are `[DAY_START_HOUR, DAY_END_HOUR)` local time.
pub const DAY_START_HOUR: u32 = 7;
pub const DAY_END_HOUR: u32 = 19;

/// Lookback window for the popup chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    #[default]
    Hour,
    Day,
    Week,
    Month,
}

impl Scale {
    pub const ALL: [Self; 4] = [Self::Hour, Self::Day, Self::Week, Self::Month];

    #[must_use]
    pub fn duration(self) -> Duration {
        match self {
            Self::Hour => Duration::hours(1),
            Self::Day => Duration::hours(24),
            Self::Week => Duration::days(7),
            Self::Month => Duration::days(30),
        }
    }

    /// Minimum gap between two plotted points.
    #[must_use]
    pub fn spacing(self) -> Duration {
        match self {
            Self::Hour => Duration::minutes(2),
            Self::Day => Duration::minutes(15),
            Self::Week => Duration::hours(2),
            Self::Month => Duration::hours(24),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(format!("unknown scale '{other}'")),
        }
    }
}

/// Restriction on which hours of the day are plotted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DayFilter {
    #[default]
    All,
    Day,
    Night,
}

impl DayFilter {
    #[must_use]
    pub fn admits(self, local_hour: u32) -> bool {
        let daytime = (DAY_START_HOUR..DAY_END_HOUR).contains(&local_hour);
        match self {
            Self::All => true,
            Self::Day => daytime,
            Self::Night => !daytime,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Day => "day",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "day" => Ok(Self::Day),
            "night" => Ok(Self::Night),
            other => Err(format!("unknown filter '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DisplayWindow {
    pub scale: Scale,
    pub filter: DayFilter,
}

impl DisplayWindow {
    #[must_use]
    pub fn new(scale: Scale, filter: DayFilter) -> Self {
        Self { scale, filter }
    }

    #[must_use]
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.scale.duration()
    }
}

/// Select the points of `series` to plot for `window` as of `now`.
///
/// Single pass over the input in its original order. `tz` decides the local
/// hour used by the day/night filter.
pub fn window_series<Tz: TimeZone>(
    series: &TimeSeries,
    window: DisplayWindow,
    now: DateTime<Utc>,
    tz: &Tz,
) -> TimeSeries {
    let cutoff = window.cutoff(now);
    let spacing = window.scale.spacing();
    let mut last_included: Option<DateTime<Utc>> = None;

    series
        .iter()
        .filter(|point| point.timestamp >= cutoff)
        .filter(|point| {
            window
                .filter
                .admits(point.timestamp.with_timezone(tz).hour())
        })
        .filter(|point| {
            let due = last_included.is_none_or(|last| point.timestamp - last >= spacing);
            if due {
                last_included = Some(point.timestamp);
            }
            due
        })
        .cloned()
        .collect()
}
