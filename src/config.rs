//! Application configuration loaded from environment variables.
//!
//! A `.env` file is read first if present; real environment variables win.

use crate::models::Coords;
use crate::services::map::DEFAULT_ZOOM;
use crate::services::presenter::DEFAULT_REDISPLAY_DELAY_MS;
use crate::services::TrackerSettings;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Page origin allowed by CORS
    pub frontend_url: String,
    /// Directory holding the key-value store files
    pub storage_dir: PathBuf,
    /// Zoom used when the map is created and when recentering
    pub map_zoom: u8,
    /// Duration of the recenter animation
    pub pan_duration_secs: f64,
    /// Cosmetic delay before a submitted form can be shown again
    pub form_redisplay_delay_ms: u64,
    /// Fixed position used as the startup location fix. If unset, the page
    /// reports the fix from the browser.
    pub home_position: Option<Coords>,
    /// Place markers for restored workouts once the map is ready
    pub restore_markers: bool,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            storage_dir: PathBuf::from("data"),
            map_zoom: DEFAULT_ZOOM,
            pan_duration_secs: 1.0,
            form_redisplay_delay_ms: DEFAULT_REDISPLAY_DELAY_MS,
            home_position: None,
            restore_markers: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let home_position = match (optional::<f64>("HOME_LAT")?, optional::<f64>("HOME_LNG")?) {
            (Some(lat), Some(lng)) => Some(Coords::new(lat, lng)),
            (None, None) => None,
            _ => return Err(ConfigError::Incomplete("HOME_LAT", "HOME_LNG")),
        };

        Ok(Self {
            port: optional("PORT")?.unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            storage_dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            map_zoom: optional("MAP_ZOOM")?.unwrap_or(DEFAULT_ZOOM),
            pan_duration_secs: optional("PAN_DURATION_SECS")?.unwrap_or(1.0),
            form_redisplay_delay_ms: optional("FORM_REDISPLAY_DELAY_MS")?
                .unwrap_or(DEFAULT_REDISPLAY_DELAY_MS),
            home_position,
            restore_markers: optional("RESTORE_MARKERS")?.unwrap_or(false),
        })
    }

    /// Tracker settings derived from this config.
    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            zoom: self.map_zoom,
            pan_duration_secs: self.pan_duration_secs,
            restore_markers: self.restore_markers,
        }
    }
}

/// Read and parse an optional variable. Present but unparsable is an error.
fn optional<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),

    #[error("{0} and {1} must be set together")]
    Incomplete(&'static str, &'static str),
}
