use chrono::{FixedOffset, Local};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Sensor backend
    pub sensor_base_url: String,
    pub sensor_request_timeout_seconds: u64,

    // Refresh settings
    pub refresh_interval_seconds: u64,
    pub liveness_threshold_seconds: i64,
    pub mini_chart_points: usize,
    /// Offset used for day/night filtering, chart labels and naive log timestamps.
    /// `None` means the host's local offset at startup.
    pub display_utc_offset_minutes: Option<i32>,

    // Popup sessions
    pub popup_session_idle_seconds: u64,
    pub popup_session_max: u64,

    // API settings
    pub api_host: String,
    pub api_port: u16,

    // Rate limiting
    pub disable_rate_limiting: bool,
    pub rate_limit_read_per_second: u64,
    pub rate_limit_read_burst: u32,
    pub rate_limit_popup_per_second: u64,
    pub rate_limit_popup_burst: u32,

    // Application metadata
    pub deployment: Deployment,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if required environment variables are not set,
    /// or `ConfigError::Invalid` if the display offset is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let display_utc_offset_minutes = match env::var("DISPLAY_UTC_OFFSET_MINUTES") {
            Ok(raw) => Some(raw.trim().parse::<i32>().map_err(|_| {
                ConfigError::Invalid("DISPLAY_UTC_OFFSET_MINUTES", raw.clone())
            })?),
            Err(_) => None,
        };

        let config = Self {
            // Sensor backend
            sensor_base_url: env::var("SENSOR_BASE_URL")
                .map_err(|_| ConfigError::Missing("SENSOR_BASE_URL"))?,
            sensor_request_timeout_seconds: env::var("SENSOR_REQUEST_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            // Refresh settings
            refresh_interval_seconds: env::var("REFRESH_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .unwrap_or(15),
            liveness_threshold_seconds: env::var("LIVENESS_THRESHOLD_SECONDS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .unwrap_or(600), // 10 minutes
            mini_chart_points: env::var("MINI_CHART_POINTS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .unwrap_or(20),
            display_utc_offset_minutes,

            // Popup sessions
            popup_session_idle_seconds: env::var("POPUP_SESSION_IDLE_SECONDS")
                .unwrap_or_else(|_| "1800".to_string())
                .parse()
                .unwrap_or(1800),
            popup_session_max: env::var("POPUP_SESSION_MAX")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),

            // API settings
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),

            // Rate limiting
            disable_rate_limiting: env::var("DISABLE_RATE_LIMITING")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            rate_limit_read_per_second: env::var("RATE_LIMIT_READ_PER_SECOND")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            rate_limit_read_burst: env::var("RATE_LIMIT_READ_BURST")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            rate_limit_popup_per_second: env::var("RATE_LIMIT_POPUP_PER_SECOND")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
            rate_limit_popup_burst: env::var("RATE_LIMIT_POPUP_BURST")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            // Application metadata
            deployment: Deployment::from_str(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
        };

        // Reject offsets chrono cannot represent up front
        config.display_offset()?;

        Ok(config)
    }

    /// Defaults for every setting with an explicit backend URL.
    #[must_use]
    pub fn with_base_url(sensor_base_url: impl Into<String>) -> Self {
        Self {
            sensor_base_url: sensor_base_url.into(),
            sensor_request_timeout_seconds: 10,
            refresh_interval_seconds: 15,
            liveness_threshold_seconds: 600,
            mini_chart_points: 20,
            display_utc_offset_minutes: None,
            popup_session_idle_seconds: 1800,
            popup_session_max: 1000,
            api_host: "0.0.0.0".to_string(),
            api_port: 3000,
            disable_rate_limiting: false,
            rate_limit_read_per_second: 5,
            rate_limit_read_burst: 60,
            rate_limit_popup_per_second: 1,
            rate_limit_popup_burst: 10,
            deployment: Deployment::Local,
        }
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    #[must_use]
    pub fn liveness_threshold(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.liveness_threshold_seconds)
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }

    /// Resolve the display timezone offset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the configured offset is out of range.
    pub fn display_offset(&self) -> Result<FixedOffset, ConfigError> {
        match self.display_utc_offset_minutes {
            Some(minutes) => FixedOffset::east_opt(minutes.saturating_mul(60)).ok_or_else(|| {
                ConfigError::Invalid("DISPLAY_UTC_OFFSET_MINUTES", minutes.to_string())
            }),
            None => Ok(*Local::now().offset()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
