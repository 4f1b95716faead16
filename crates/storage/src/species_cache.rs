//! Species summary caches.
//!
//! Two flat JSON documents written by the ingester and read once at
//! startup: species → observed record count, and species → expected global
//! proportion. A missing or unreadable file is logged and yields an empty
//! mapping.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use sighting_common::SightingResult;

pub const SPECIES_COUNTS_FILE: &str = "species_counts_cache.json";
pub const SPECIES_PROPORTIONS_FILE: &str = "species_proportions.json";

/// Observed record count per species. Unknown species count as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesCounts(BTreeMap<String, u64>);

impl SpeciesCounts {
    pub fn new(counts: BTreeMap<String, u64>) -> Self {
        Self(counts)
    }

    pub fn load(path: impl AsRef<Path>) -> Self {
        Self(load_map(path.as_ref()))
    }

    pub fn get(&self, species: &str) -> u64 {
        self.0.get(species).copied().unwrap_or(0)
    }

    /// Cached species names, alphabetically.
    pub fn species(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn as_map(&self) -> &BTreeMap<String, u64> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn write(&self, path: impl AsRef<Path>) -> SightingResult<()> {
        write_map(path.as_ref(), &self.0)
    }
}

/// Expected proportion (0-1) per species.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesProportions(BTreeMap<String, f64>);

impl SpeciesProportions {
    pub fn new(proportions: BTreeMap<String, f64>) -> Self {
        Self(proportions)
    }

    pub fn load(path: impl AsRef<Path>) -> Self {
        Self(load_map(path.as_ref()))
    }

    /// Expected proportion floored at `floor`. Unknown species get `floor`.
    pub fn expected(&self, species: &str, floor: f64) -> f64 {
        self.0.get(species).copied().unwrap_or(floor).max(floor)
    }

    pub fn get(&self, species: &str) -> Option<f64> {
        self.0.get(species).copied()
    }

    pub fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn write(&self, path: impl AsRef<Path>) -> SightingResult<()> {
        write_map(path.as_ref(), &self.0)
    }
}

/// Both caches, loaded once and shared read-only by every request.
#[derive(Debug, Clone, Default)]
pub struct SpeciesCaches {
    pub counts: SpeciesCounts,
    pub proportions: SpeciesProportions,
}

impl SpeciesCaches {
    /// Load both cache files from `dir`.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let caches = Self {
            counts: SpeciesCounts::load(dir.join(SPECIES_COUNTS_FILE)),
            proportions: SpeciesProportions::load(dir.join(SPECIES_PROPORTIONS_FILE)),
        };

        info!(
            dir = %dir.display(),
            counts = caches.counts.as_map().len(),
            proportions = caches.proportions.as_map().len(),
            "Loaded species caches"
        );

        caches
    }
}

fn load_map<V: DeserializeOwned>(path: &Path) -> BTreeMap<String, V> {
    if !path.exists() {
        warn!(path = %path.display(), "Species cache file not found, using empty mapping");
        return BTreeMap::new();
    }

    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()));

    match parsed {
        Ok(map) => map,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to load species cache, using empty mapping");
            BTreeMap::new()
        }
    }
}

fn write_map<V: Serialize>(path: &Path, map: &BTreeMap<String, V>) -> SightingResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(map)?;
    std::fs::write(path, json)?;
    Ok(())
}
