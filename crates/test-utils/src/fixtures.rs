//! Common test fixtures for sighting-map tests.
//!
//! The Fox/Owl set is the canonical scenario: one cell at (65.0, 26.0) with
//! three Fox records between 2025-01-01 and 2025-01-10, and a single Owl
//! record in a separate cell at (60.1, 24.9).

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;

use sighting_common::{
    AggregatedCell, DayCell, SightingError, SightingRecord, SightingResult, WeekCount,
};
use storage::{
    CellQuery, MemorySightingStore, SightingStore, SpeciesCaches, SpeciesCounts,
    SpeciesFilter, SpeciesProportions, SPECIES_COUNTS_FILE, SPECIES_PROPORTIONS_FILE,
};

/// Coordinates of the Fox cell in the Fox/Owl set.
pub const FOX_CELL: (f64, f64) = (65.0, 26.0);

/// Coordinates of the Owl cell in the Fox/Owl set.
pub const OWL_CELL: (f64, f64) = (60.1, 24.9);

/// Timestamp at 12:00 on the given date.
pub fn noon(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap_or_else(|| panic!("invalid fixture date {}-{}-{}", year, month, day))
}

/// Build a record with day-of-year and year derived from `time`.
pub fn sighting(
    id: &str,
    species: &str,
    time: NaiveDateTime,
    latitude: f64,
    longitude: f64,
) -> SightingRecord {
    SightingRecord {
        id: id.to_string(),
        species: species.to_string(),
        time,
        latitude,
        longitude,
        day_of_year: time.ordinal(),
        year: time.year(),
    }
}

pub fn fox_owl_records() -> Vec<SightingRecord> {
    vec![
        sighting("fox-1", "Fox", noon(2025, 1, 1), FOX_CELL.0, FOX_CELL.1),
        sighting("fox-2", "Fox", noon(2025, 1, 4), FOX_CELL.0, FOX_CELL.1),
        sighting("fox-3", "Fox", noon(2025, 1, 10), FOX_CELL.0, FOX_CELL.1),
        sighting("owl-1", "Owl", noon(2025, 1, 8), OWL_CELL.0, OWL_CELL.1),
    ]
}

pub fn fox_owl_store() -> MemorySightingStore {
    MemorySightingStore::new(fox_owl_records())
}

/// Caches matching the Fox/Owl set: counts 3/1, proportions 0.75/0.25.
pub fn fox_owl_caches() -> SpeciesCaches {
    SpeciesCaches {
        counts: SpeciesCounts::new(BTreeMap::from([
            ("Fox".to_string(), 3),
            ("Owl".to_string(), 1),
        ])),
        proportions: SpeciesProportions::new(BTreeMap::from([
            ("Fox".to_string(), 0.75),
            ("Owl".to_string(), 0.25),
        ])),
    }
}

/// Write both cache files for `caches` into `dir`.
pub fn write_caches(dir: &Path, caches: &SpeciesCaches) -> SightingResult<()> {
    caches.counts.write(dir.join(SPECIES_COUNTS_FILE))?;
    caches.proportions.write(dir.join(SPECIES_PROPORTIONS_FILE))?;
    Ok(())
}

/// Temp directory holding the cache files for `caches`. Removed on drop.
pub fn temp_cache_dir(caches: &SpeciesCaches) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_caches(dir.path(), caches).expect("write cache files");
    dir
}

/// Store whose every query fails as if the database were down.
#[derive(Debug, Clone, Default)]
pub struct UnavailableStore;

impl UnavailableStore {
    fn fail<T>(&self) -> SightingResult<T> {
        Err(SightingError::DatabaseError(
            "connection refused".to_string(),
        ))
    }
}

#[async_trait]
impl SightingStore for UnavailableStore {
    fn backend(&self) -> &'static str {
        "unavailable"
    }

    async fn ping(&self) -> SightingResult<()> {
        self.fail()
    }

    async fn distinct_species(&self) -> SightingResult<Vec<String>> {
        self.fail()
    }

    async fn species_counts(&self) -> SightingResult<BTreeMap<String, u64>> {
        self.fail()
    }

    async fn aggregate_cells(&self, _query: &CellQuery) -> SightingResult<Vec<AggregatedCell>> {
        self.fail()
    }

    async fn weekly_counts(&self, _filter: &SpeciesFilter) -> SightingResult<Vec<WeekCount>> {
        self.fail()
    }

    async fn day_cells(&self, _filter: &SpeciesFilter) -> SightingResult<Vec<DayCell>> {
        self.fail()
    }
}
