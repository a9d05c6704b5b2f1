//! Map configuration.
//!
//! Every tunable has a default matching the production dashboard, so an
//! empty JSON object (or no config file at all) yields a working setup.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Zoom levels at which finer resolution levels become selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomThresholds {
    /// Zoom at which level 2 (MSOA/Intermediate) geographies are revealed
    pub show_level_2: u32,
    /// Zoom at which level 3 (LSOA/Datazone) geographies are revealed
    pub show_level_3: u32,
}

impl Default for ZoomThresholds {
    fn default() -> Self {
        Self {
            show_level_2: 8,
            show_level_3: 9,
        }
    }
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Base URL of the backend (empty for same-origin)
    pub api_url: String,
    pub default_period_start: i32,
    pub default_period_end: i32,
    /// Earliest selectable period
    pub period_min: i32,
    /// Latest selectable period
    pub period_max: i32,
    /// Default number of graphs per row
    pub default_area_scale: u32,
    pub area_scale_max: u32,
    pub default_lat: f64,
    pub default_lng: f64,
    pub default_zoom: u32,
    pub max_zoom: u32,
    pub zoom_thresholds: ZoomThresholds,
    /// Padding in screen pixels added around the visible bounds before fetching geometries
    pub pixel_padding: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            default_period_start: 2010,
            default_period_end: 2018,
            period_min: 2010,
            period_max: 2100,
            default_area_scale: 1,
            area_scale_max: 4,
            default_lat: 55.69142309402058,
            default_lng: -3.7832450866699223,
            default_zoom: 5,
            max_zoom: 15,
            zoom_thresholds: ZoomThresholds::default(),
            pixel_padding: 40.0,
        }
    }
}

impl MapConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: MapConfig = serde_json::from_str(json)?;
        if config.period_min > config.period_max {
            anyhow::bail!(
                "period_min ({}) is after period_max ({})",
                config.period_min,
                config.period_max
            );
        }
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded map config from {}", path.display());
        Ok(config)
    }

    /// Join an endpoint path onto the configured API base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), path)
    }
}
