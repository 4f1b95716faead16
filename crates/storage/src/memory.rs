//! In-memory sighting store.
//!
//! Evaluates the same queries as the PostgreSQL store over a record list
//! held in memory. Used for local development without a database and in
//! tests.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};

use sighting_common::{
    week_start, AggregatedCell, CellKey, DayCell, SightingRecord, SightingResult, WeekCount,
};

use crate::query::{CellQuery, SpeciesFilter};
use crate::store::SightingStore;

#[derive(Debug, Clone, Default)]
pub struct MemorySightingStore {
    records: Vec<SightingRecord>,
}

impl MemorySightingStore {
    pub fn new(records: Vec<SightingRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn filtered<'a>(&'a self, filter: &'a SpeciesFilter) -> impl Iterator<Item = &'a SightingRecord> {
        self.records.iter().filter(move |r| filter.matches(&r.species))
    }
}

struct CellAccumulator<'a> {
    count: u64,
    species: BTreeSet<&'a str>,
    earliest: NaiveDateTime,
    latest: NaiveDateTime,
    min_day: u32,
    species_count: u64,
}

#[async_trait]
impl SightingStore for MemorySightingStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> SightingResult<()> {
        Ok(())
    }

    async fn distinct_species(&self) -> SightingResult<Vec<String>> {
        let names: BTreeSet<&str> = self.records.iter().map(|r| r.species.as_str()).collect();
        Ok(names.into_iter().map(String::from).collect())
    }

    async fn species_counts(&self) -> SightingResult<BTreeMap<String, u64>> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.species.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn aggregate_cells(&self, query: &CellQuery) -> SightingResult<Vec<AggregatedCell>> {
        let mut cells: BTreeMap<CellKey, CellAccumulator<'_>> = BTreeMap::new();

        for record in self.filtered(&query.filter) {
            let matches_counted = query
                .count_species
                .as_deref()
                .map_or(false, |s| s == record.species);

            let acc = cells.entry(record.cell_key()).or_insert_with(|| CellAccumulator {
                count: 0,
                species: BTreeSet::new(),
                earliest: record.time,
                latest: record.time,
                min_day: record.day_of_year,
                species_count: 0,
            });
            acc.count += 1;
            acc.species.insert(record.species.as_str());
            acc.earliest = acc.earliest.min(record.time);
            acc.latest = acc.latest.max(record.time);
            acc.min_day = acc.min_day.min(record.day_of_year);
            if matches_counted {
                acc.species_count += 1;
            }
        }

        let mut result = Vec::with_capacity(cells.len());
        for (key, acc) in cells {
            if query.count_species.is_some() && acc.species_count == 0 {
                continue;
            }

            let mut cell = AggregatedCell::new(
                key.latitude,
                key.longitude,
                acc.count,
                acc.species.into_iter().map(String::from).collect(),
                acc.earliest,
                acc.latest,
            )?;
            if query.min_day {
                cell = cell.with_min_day(acc.min_day);
            }
            if query.count_species.is_some() {
                cell = cell.with_species_count(acc.species_count);
            }
            result.push(cell);
        }

        Ok(result)
    }

    async fn weekly_counts(&self, filter: &SpeciesFilter) -> SightingResult<Vec<WeekCount>> {
        let mut weeks = BTreeMap::new();
        for record in self.filtered(filter) {
            *weeks.entry(week_start(record.time.date())).or_insert(0u64) += 1;
        }
        Ok(weeks
            .into_iter()
            .map(|(week, count)| WeekCount { week, count })
            .collect())
    }

    async fn day_cells(&self, filter: &SpeciesFilter) -> SightingResult<Vec<DayCell>> {
        let mut groups: BTreeMap<(u32, CellKey), u64> = BTreeMap::new();
        for record in self.filtered(filter) {
            *groups.entry((record.day_of_year, record.cell_key())).or_insert(0) += 1;
        }
        Ok(groups
            .into_iter()
            .map(|((day_of_year, key), count)| DayCell {
                latitude: key.latitude,
                longitude: key.longitude,
                day_of_year,
                count,
            })
            .collect())
    }
}
