//! Sighting records and the per-cell aggregates built from them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::{SightingError, SightingResult};

/// One upstream sighting row. Read-only to the map pipeline.
///
/// Latitude and longitude are quantized by ingestion, so identical
/// coordinates group into the same cell without rounding here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SightingRecord {
    pub id: String,
    pub species: String,
    pub time: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub day_of_year: u32,
    pub year: i32,
}

impl SightingRecord {
    pub fn cell_key(&self) -> CellKey {
        CellKey::new(self.latitude, self.longitude)
    }
}

/// Grid cell key. Coordinates are compared by bit pattern for equality and
/// by total order for sorting.
#[derive(Debug, Clone, Copy)]
pub struct CellKey {
    pub latitude: f64,
    pub longitude: f64,
}

impl CellKey {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl PartialEq for CellKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellKey {}

impl PartialOrd for CellKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.latitude
            .total_cmp(&other.latitude)
            .then_with(|| self.longitude.total_cmp(&other.longitude))
    }
}

impl std::hash::Hash for CellKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}

/// Aggregate of all sightings sharing one grid cell.
///
/// Invariants (checked by [`AggregatedCell::new`]): `count >= 1`,
/// `earliest <= latest`, and `species` is non-empty, sorted and unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedCell {
    pub latitude: f64,
    pub longitude: f64,
    pub count: u64,
    pub species: Vec<String>,
    pub earliest: NaiveDateTime,
    pub latest: NaiveDateTime,
    /// Records of one requested species within this cell.
    pub species_count: Option<u64>,
    /// Smallest day-of-year observed in this cell.
    pub min_day: Option<u32>,
}

impl AggregatedCell {
    pub fn new(
        latitude: f64,
        longitude: f64,
        count: u64,
        mut species: Vec<String>,
        earliest: NaiveDateTime,
        latest: NaiveDateTime,
    ) -> SightingResult<Self> {
        if count == 0 {
            return Err(SightingError::InvalidRow(format!(
                "cell ({}, {}) has zero records",
                latitude, longitude
            )));
        }
        if earliest > latest {
            return Err(SightingError::InvalidRow(format!(
                "cell ({}, {}) has earliest {} after latest {}",
                latitude, longitude, earliest, latest
            )));
        }
        species.sort();
        species.dedup();
        if species.is_empty() {
            return Err(SightingError::InvalidRow(format!(
                "cell ({}, {}) has no species",
                latitude, longitude
            )));
        }

        Ok(Self {
            latitude,
            longitude,
            count,
            species,
            earliest,
            latest,
            species_count: None,
            min_day: None,
        })
    }

    pub fn with_species_count(mut self, species_count: u64) -> Self {
        self.species_count = Some(species_count);
        self
    }

    pub fn with_min_day(mut self, min_day: u32) -> Self {
        self.min_day = Some(min_day);
        self
    }

    pub fn key(&self) -> CellKey {
        CellKey::new(self.latitude, self.longitude)
    }

    /// The only species in this cell, if there is exactly one.
    pub fn single_species(&self) -> Option<&str> {
        match self.species.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}

/// Record count for one Monday-keyed week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekCount {
    pub week: NaiveDate,
    pub count: u64,
}

/// Record count for one (cell, day-of-year) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCell {
    pub latitude: f64,
    pub longitude: f64,
    pub day_of_year: u32,
    pub count: u64,
}
