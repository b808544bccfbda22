//! Global inkboard configuration.
//!
//! Loaded from ~/.config/inkboard/config.toml with INKBOARD_-prefixed
//! environment variables layered on top, so a bare deployment can be
//! configured entirely through the environment.

use std::path::PathBuf;

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{InkboardError, InkboardResult};

fn default_port() -> u16 {
    5001
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("inkboard"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

fn default_weather_lat() -> f64 {
    28.4595
}

fn default_weather_lon() -> f64 {
    77.0266
}

fn default_location_label() -> String {
    "Gurugram, India".to_string()
}

fn default_display_timezone() -> Tz {
    chrono_tz::Asia::Kolkata
}

fn default_calendar_tool() -> String {
    "icalBuddy".to_string()
}

fn default_sync_interval_secs() -> u64 {
    600
}

/// Global configuration at ~/.config/inkboard/config.toml
#[derive(Debug, Deserialize, Clone)]
pub struct InkboardConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the calendar/todo snapshot files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Optional iCal feed URL, used when no local calendar snapshot exists.
    pub calendar_url: Option<String>,

    #[serde(default = "default_weather_lat")]
    pub weather_lat: f64,

    #[serde(default = "default_weather_lon")]
    pub weather_lon: f64,

    /// Location name shown next to the weather panel.
    #[serde(default = "default_location_label")]
    pub location_label: String,

    pub github_username: Option<String>,
    pub github_token: Option<String>,

    /// Timezone that defines "today" and all display formatting.
    #[serde(default = "default_display_timezone")]
    pub display_timezone: Tz,

    /// Binary that exports today's events (icalBuddy or a compatible wrapper).
    #[serde(default = "default_calendar_tool")]
    pub calendar_tool: String,

    /// Command line for the reminders exporter. Todo sync is skipped when unset.
    pub reminders_tool: Option<String>,

    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,
}

impl InkboardConfig {
    pub fn config_path() -> InkboardResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| InkboardError::Config("Could not determine config directory".into()))?
            .join("inkboard");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> InkboardResult<Self> {
        let config_path = Self::config_path()?;

        Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(Environment::with_prefix("INKBOARD").try_parsing(true))
            .build()
            .map_err(|e| InkboardError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| InkboardError::Config(e.to_string()))
    }

    pub fn calendar_snapshot_path(&self) -> PathBuf {
        self.data_dir.join("calendar.json")
    }

    pub fn todos_snapshot_path(&self) -> PathBuf {
        self.data_dir.join("todos.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: InkboardConfig = toml::from_str("").unwrap();

        assert_eq!(config.port, 5001);
        assert_eq!(config.display_timezone, chrono_tz::Asia::Kolkata);
        assert_eq!(config.calendar_tool, "icalBuddy");
        assert_eq!(config.sync_interval_secs, 600);
        assert!(config.calendar_url.is_none());
        assert!(config.reminders_tool.is_none());
    }

    #[test]
    fn test_timezone_parses_from_iana_name() {
        let config: InkboardConfig =
            toml::from_str("display_timezone = \"Europe/Berlin\"").unwrap();

        assert_eq!(config.display_timezone, chrono_tz::Europe::Berlin);
    }
}
