//! Species summaries written next to the map service.

use std::collections::BTreeMap;

use sighting_common::SightingRecord;
use storage::{SpeciesCounts, SpeciesProportions};

/// Per-species record counts accumulated while ingesting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesTally {
    counts: BTreeMap<String, u64>,
    total: u64,
}

impl SpeciesTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: &SightingRecord) {
        *self.counts.entry(record.species.clone()).or_default() += 1;
        self.total += 1;
    }

    pub fn extend<'a, I: IntoIterator<Item = &'a SightingRecord>>(&mut self, records: I) {
        for record in records {
            self.add(record);
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn species_count(&self) -> usize {
        self.counts.len()
    }

    pub fn counts(&self) -> SpeciesCounts {
        SpeciesCounts::new(self.counts.clone())
    }

    /// Share of each species in the tally, rounded to four decimals.
    pub fn proportions(&self) -> SpeciesProportions {
        if self.total == 0 {
            return SpeciesProportions::default();
        }
        let total = self.total as f64;
        SpeciesProportions::new(
            self.counts
                .iter()
                .map(|(species, &count)| (species.clone(), round4(count as f64 / total)))
                .collect(),
        )
    }
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}
