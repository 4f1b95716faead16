//! Service configuration file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use map_core::Viewport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub viewport: Viewport,
    /// Directory with the species cache files.
    pub cache_dir: PathBuf,
    pub store: StoreConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            cache_dir: PathBuf::from("data"),
            store: StoreConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { max_connections: 5 }
    }
}

impl MapConfig {
    /// Load from a YAML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse: {:?}", path))?;

        info!(path = %path.display(), cache_dir = %config.cache_dir.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = MapConfig::from_yaml("cache_dir: /var/lib/sightings\n").unwrap();
        assert_eq!(config.cache_dir, PathBuf::from("/var/lib/sightings"));
        assert_eq!(config.viewport, Viewport::default());
        assert_eq!(config.store.max_connections, 5);
    }

    #[test]
    fn test_viewport_override() {
        let config = MapConfig::from_yaml(
            "viewport:\n  latitude: 60.17\n  longitude: 24.94\n  zoom: 9\nstore:\n  max_connections: 12\n",
        )
        .unwrap();
        assert_eq!(config.viewport.latitude, 60.17);
        assert_eq!(config.viewport.zoom, 9.0);
        assert_eq!(config.store.max_connections, 12);
    }

    #[test]
    fn test_missing_file() {
        let config = MapConfig::load("/nonexistent/map.yaml").unwrap();
        assert_eq!(config, MapConfig::default());
    }

    #[test]
    fn test_empty_file() {
        assert_eq!(MapConfig::from_yaml("").unwrap(), MapConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(MapConfig::from_yaml("viewport: [1, 2").is_err());
    }
}
