use crate::domain::phase::ClockWindows;
use chrono::{FixedOffset, NaiveTime};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub tracker: TrackerConfig,
    pub source: SourceConfig,
    pub database: DatabaseConfig,
    pub notify: NotifyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Three-letter abbreviation of the tracked team (e.g. "ARI")
    pub team_abbrev: String,
    /// Key for the persisted tracked-game document
    #[serde(default = "default_tracker_id")]
    pub tracker_id: String,
    /// Seconds between poll ticks
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Daily reset window start, "HH:MM" in the reference zone
    #[serde(default = "default_reset_start")]
    pub reset_start: String,
    /// Daily reset window end / discovery window start, "HH:MM"
    #[serde(default = "default_reset_end")]
    pub reset_end: String,
    /// Length of the discovery window in seconds
    #[serde(default = "default_discovery_window")]
    pub discovery_window_secs: u64,
    /// Reference zone as whole hours east of UTC (e.g. -5 for the
    /// team's home zone). Window boundaries are evaluated here.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,
}

fn default_tracker_id() -> String {
    "nhl".to_string()
}

fn default_poll_interval() -> u64 {
    30
}

fn default_reset_start() -> String {
    "09:00".to_string()
}

fn default_reset_end() -> String {
    "10:00".to_string()
}

fn default_discovery_window() -> u64 {
    45
}

fn default_utc_offset() -> i32 {
    -5
}

impl TrackerConfig {
    pub fn reference_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }

    /// Build the classifier's window boundaries from the configured strings.
    pub fn clock_windows(&self) -> Result<ClockWindows, String> {
        let reset_start = parse_time(&self.reset_start)?;
        let reset_end = parse_time(&self.reset_end)?;
        Ok(ClockWindows {
            reset_start,
            reset_end,
            discovery_secs: self.discovery_window_secs,
        })
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|e| format!("invalid time '{raw}': {e}"))
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the NHL web API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api-web.nhle.com/v1".to_string()
}

fn default_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// Chat webhook URL the notifier posts to
    pub webhook_url: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("tracker.poll_interval_secs", 30)?
            .set_default("database.max_connections", 5)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(
                File::from(config_dir.join(
                    std::env::var("HOWLER_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (HOWLER_NOTIFY__WEBHOOK_URL, etc.)
            .add_source(
                Environment::with_prefix("HOWLER")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.tracker.team_abbrev.trim().is_empty() {
            errors.push("team_abbrev must not be empty".to_string());
        }

        if self.tracker.poll_interval_secs == 0 {
            errors.push("poll_interval_secs must be positive".to_string());
        }

        if self.tracker.utc_offset_hours < -12 || self.tracker.utc_offset_hours > 14 {
            errors.push("utc_offset_hours must be within [-12, 14]".to_string());
        }

        match self.tracker.clock_windows() {
            Ok(w) => {
                if w.reset_start >= w.reset_end {
                    errors.push("reset_start must precede reset_end".to_string());
                }
            }
            Err(e) => errors.push(e),
        }

        if self.notify.webhook_url.trim().is_empty() {
            errors.push("webhook_url must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
