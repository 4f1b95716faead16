//! Ingestion settings and the upstream column layout.

use serde::{Deserialize, Serialize};

use crate::error::{IngestionError, Result};

/// Zero-based TSV column indices.
pub mod columns {
    pub const SPECIES: usize = 0;
    pub const PREDICTION: usize = 1;
    pub const RESULT_ID: usize = 5;
    pub const TIME: usize = 10;
    pub const LATITUDE: usize = 17;
    pub const LONGITUDE: usize = 18;
}

pub const DEFAULT_THRESHOLD: f64 = 0.8;
pub const DEFAULT_YEAR: i32 = 2025;
pub const DEFAULT_BATCH_SIZE: usize = 100_000;
pub const DEFAULT_MAX_ROWS: usize = 10_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Rows with a prediction below this are dropped.
    pub threshold: f64,
    /// Inclusive year range.
    pub start_year: i32,
    pub end_year: i32,
    pub batch_size: usize,
    /// Stop after this many accepted rows.
    pub max_rows: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            start_year: DEFAULT_YEAR,
            end_year: DEFAULT_YEAR,
            batch_size: DEFAULT_BATCH_SIZE,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl IngestOptions {
    pub fn validate(&self) -> Result<()> {
        if self.start_year > self.end_year {
            return Err(IngestionError::InvalidConfig(format!(
                "start year {} is after end year {}",
                self.start_year, self.end_year
            )));
        }
        if self.batch_size == 0 {
            return Err(IngestionError::InvalidConfig(
                "batch size must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(IngestionError::InvalidConfig(format!(
                "threshold {} is outside [0, 1]",
                self.threshold
            )));
        }
        Ok(())
    }

    pub fn year_in_range(&self, year: i32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }
}
