//! Batch ingestion into the sighting store.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;
use tracing::info;

use sighting_common::SightingRecord;
use storage::{
    PgSightingStore, SpeciesCounts, SpeciesProportions, SPECIES_COUNTS_FILE,
    SPECIES_PROPORTIONS_FILE,
};

use crate::config::IngestOptions;
use crate::error::Result;
use crate::summary::SpeciesTally;
use crate::tsv::{IngestStats, TsvReader};

/// Destination for accepted records.
#[async_trait]
pub trait SightingSink: Send {
    /// Write one batch, returning the number of rows written.
    async fn write_batch(&mut self, records: &[SightingRecord]) -> Result<u64>;
}

#[async_trait]
impl SightingSink for PgSightingStore {
    async fn write_batch(&mut self, records: &[SightingRecord]) -> Result<u64> {
        Ok(self.insert_batch(records).await?)
    }
}

#[async_trait]
impl SightingSink for Vec<SightingRecord> {
    async fn write_batch(&mut self, records: &[SightingRecord]) -> Result<u64> {
        self.extend_from_slice(records);
        Ok(records.len() as u64)
    }
}

/// Result of an ingestion run.
#[derive(Debug, Clone)]
pub struct IngestionResult {
    pub stats: IngestStats,
    /// Rows reported written by the sink.
    pub rows_written: u64,
    pub batches: usize,
    /// Counts of the accepted rows, for the proportion cache.
    pub tally: SpeciesTally,
}

pub struct Ingester {
    options: IngestOptions,
}

impl Ingester {
    pub fn new(options: IngestOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    pub async fn ingest_file<S: SightingSink>(&self, path: impl AsRef<Path>, sink: &mut S) -> Result<IngestionResult> {
        let path = path.as_ref();
        info!(path = %path.display(), "Ingesting sightings");
        let reader = TsvReader::open(path, self.options.clone())?;
        self.ingest(reader, sink).await
    }

    pub async fn ingest<R, S>(&self, mut reader: TsvReader<R>, sink: &mut S) -> Result<IngestionResult>
    where
        R: BufRead + Send,
        S: SightingSink,
    {
        let mut tally = SpeciesTally::new();
        let mut rows_written = 0;
        let mut batches = 0;

        while let Some(batch) = reader.next_batch()? {
            tally.extend(&batch);
            rows_written += sink.write_batch(&batch).await?;
            batches += 1;
            info!(
                batch = batches,
                rows = batch.len(),
                total = rows_written,
                "Inserted batch"
            );
        }

        let stats = reader.into_stats();
        info!(
            accepted = stats.accepted,
            skipped = stats.skipped(),
            low_confidence = stats.low_confidence,
            missing_field = stats.missing_field,
            malformed = stats.malformed,
            outside_years = stats.outside_years,
            species = tally.species_count(),
            "Ingestion complete"
        );

        Ok(IngestionResult {
            stats,
            rows_written,
            batches,
            tally,
        })
    }
}

/// Write both species cache files into `dir`.
///
/// Counts come from the store so they cover every row ever ingested;
/// proportions come from the rows of this run.
pub fn write_caches(dir: impl AsRef<Path>, counts: BTreeMap<String, u64>, proportions: &SpeciesProportions) -> Result<()> {
    let dir = dir.as_ref();
    SpeciesCounts::new(counts).write(dir.join(SPECIES_COUNTS_FILE))?;
    proportions.write(dir.join(SPECIES_PROPORTIONS_FILE))?;
    info!(dir = %dir.display(), "Wrote species caches");
    Ok(())
}
