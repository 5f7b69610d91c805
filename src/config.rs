use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, source::DataSource, view::StyleConfig};

/// Environment variable holding the map provider's access key.
pub const MAPS_API_KEY_ENV: &str = "KENMAP_MAPS_API_KEY";

/// Default document name, as served next to the web app.
pub const DEFAULT_SOURCE: &str = "Constituency_with_geometry.geojson";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Initial view and styling for the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
    pub source: DataSource,
    pub center: LatLng,
    pub zoom: u8,
    pub style: StyleConfig,
    /// Handed to the map widget untouched; never written back out.
    #[serde(skip)]
    pub maps_api_key: Option<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Path(DEFAULT_SOURCE.into()),
            // Centre of Kenya
            center: LatLng { lat: 0.0236, lng: 37.9062 },
            zoom: 6,
            style: StyleConfig::default(),
            maps_api_key: None,
        }
    }
}

impl ViewConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        serde_json::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
    }

    /// Pick up the map key from the environment, if set and non-empty.
    pub fn with_env(mut self) -> Self {
        self.maps_api_key = std::env::var(MAPS_API_KEY_ENV).ok()
            .filter(|key| !key.trim().is_empty())
            .or(self.maps_api_key);
        self
    }
}
