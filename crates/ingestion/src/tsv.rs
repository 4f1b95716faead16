//! Upstream TSV parsing.

use chrono::Datelike;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use sighting_common::{parse_timestamp, SightingRecord};

use crate::config::{columns, IngestOptions};
use crate::error::{IngestionError, Result};

/// Why a row was not ingested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Prediction below the threshold, or not a number.
    LowConfidence,
    MissingField,
    /// Unparseable timestamp or coordinate.
    Malformed,
    OutsideYears,
}

/// Row counters for one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub rows_read: u64,
    pub accepted: u64,
    pub low_confidence: u64,
    pub missing_field: u64,
    pub malformed: u64,
    pub outside_years: u64,
}

impl IngestStats {
    pub fn skipped(&self) -> u64 {
        self.low_confidence + self.missing_field + self.malformed + self.outside_years
    }

    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::LowConfidence => self.low_confidence += 1,
            SkipReason::MissingField => self.missing_field += 1,
            SkipReason::Malformed => self.malformed += 1,
            SkipReason::OutsideYears => self.outside_years += 1,
        }
    }
}

fn field<'a>(fields: &[&'a str], index: usize) -> Option<&'a str> {
    fields
        .get(index)
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
}

/// Parse one data line.
///
/// The prediction is checked first, so a low-confidence row is reported as
/// such even when other fields are missing.
pub fn parse_line(line: &str, options: &IngestOptions) -> std::result::Result<SightingRecord, SkipReason> {
    let fields: Vec<&str> = line.trim_end_matches(['\n', '\r']).split('\t').collect();

    let prediction: f64 = field(&fields, columns::PREDICTION)
        .and_then(|p| p.parse().ok())
        .ok_or(SkipReason::LowConfidence)?;
    if prediction.is_nan() || prediction < options.threshold {
        return Err(SkipReason::LowConfidence);
    }

    let (Some(species), Some(id), Some(time), Some(lat), Some(lon)) = (
        field(&fields, columns::SPECIES),
        field(&fields, columns::RESULT_ID),
        field(&fields, columns::TIME),
        field(&fields, columns::LATITUDE),
        field(&fields, columns::LONGITUDE),
    ) else {
        return Err(SkipReason::MissingField);
    };

    let time = parse_timestamp(time).map_err(|_| SkipReason::Malformed)?;
    if !options.year_in_range(time.year()) {
        return Err(SkipReason::OutsideYears);
    }

    let latitude: f64 = lat.parse().map_err(|_| SkipReason::Malformed)?;
    let longitude: f64 = lon.parse().map_err(|_| SkipReason::Malformed)?;

    Ok(SightingRecord {
        id: id.to_string(),
        species: species.to_string(),
        time,
        latitude,
        longitude,
        day_of_year: time.ordinal(),
        year: time.year(),
    })
}

/// Streams accepted records from a TSV source in batches.
///
/// The first line is a header and is never parsed.
pub struct TsvReader<R> {
    lines: std::io::Lines<R>,
    options: IngestOptions,
    stats: IngestStats,
    header_skipped: bool,
}

impl TsvReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>, options: IngestOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file), options))
    }
}

impl<R: BufRead> TsvReader<R> {
    pub fn new(reader: R, options: IngestOptions) -> Self {
        Self {
            lines: reader.lines(),
            options,
            stats: IngestStats::default(),
            header_skipped: false,
        }
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    pub fn into_stats(self) -> IngestStats {
        self.stats
    }

    /// Next batch of up to `batch_size` records; `None` once the input or the
    /// row limit is exhausted.
    pub fn next_batch(&mut self) -> Result<Option<Vec<SightingRecord>>> {
        if !self.header_skipped {
            self.header_skipped = true;
            if self.lines.next().transpose()?.is_none() {
                return Err(IngestionError::EmptyInput("missing header line".to_string()));
            }
        }

        let mut batch = Vec::new();
        while batch.len() < self.options.batch_size && (self.stats.accepted as usize) < self.options.max_rows {
            let Some(line) = self.lines.next().transpose()? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            self.stats.rows_read += 1;

            match parse_line(&line, &self.options) {
                Ok(record) => {
                    self.stats.accepted += 1;
                    batch.push(record);
                }
                Err(reason) => {
                    debug!(line = self.stats.rows_read, ?reason, "Skipping row");
                    self.stats.record_skip(reason);
                }
            }
        }

        Ok(if batch.is_empty() { None } else { Some(batch) })
    }

    /// Every remaining record in one vector.
    pub fn read_all(&mut self) -> Result<Vec<SightingRecord>> {
        let mut records = Vec::new();
        while let Some(batch) = self.next_batch()? {
            records.extend(batch);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 19-column row with the given values in the used columns.
    fn row(species: &str, prediction: &str, id: &str, time: &str, lat: &str, lon: &str) -> String {
        let mut fields = vec![""; 19];
        fields[columns::SPECIES] = species;
        fields[columns::PREDICTION] = prediction;
        fields[columns::RESULT_ID] = id;
        fields[columns::TIME] = time;
        fields[columns::LATITUDE] = lat;
        fields[columns::LONGITUDE] = lon;
        fields.join("\t")
    }

    #[test]
    fn test_parse_valid_row() {
        let line = row("Fox", "0.93", "r1", "2025-05-16T11:43:27.235000", "65.0", "26.0");
        let record = parse_line(&line, &IngestOptions::default()).unwrap();

        assert_eq!(record.id, "r1");
        assert_eq!(record.species, "Fox");
        assert_eq!(record.day_of_year, 136);
        assert_eq!(record.year, 2025);
        assert_eq!(record.latitude, 65.0);
    }

    #[test]
    fn test_skip_reasons() {
        let options = IngestOptions::default();
        let ok_time = "2025-01-01T00:00:00";

        assert_eq!(
            parse_line(&row("Fox", "0.5", "r1", ok_time, "65", "26"), &options),
            Err(SkipReason::LowConfidence)
        );
        assert_eq!(
            parse_line(&row("Fox", "high", "r1", ok_time, "65", "26"), &options),
            Err(SkipReason::LowConfidence)
        );
        assert_eq!(
            parse_line(&row("Fox", "0.9", "", ok_time, "65", "26"), &options),
            Err(SkipReason::MissingField)
        );
        assert_eq!(
            parse_line(&row("Fox", "0.9", "r1", "yesterday", "65", "26"), &options),
            Err(SkipReason::Malformed)
        );
        assert_eq!(
            parse_line(&row("Fox", "0.9", "r1", "2024-06-01T00:00:00", "65", "26"), &options),
            Err(SkipReason::OutsideYears)
        );
        assert_eq!(parse_line("Fox\t0.9", &options), Err(SkipReason::MissingField));
    }

    #[test]
    fn test_threshold_inclusive() {
        let line = row("Fox", "0.8", "r1", "2025-01-01T00:00:00", "65", "26");
        assert!(parse_line(&line, &IngestOptions::default()).is_ok());
    }

    #[test]
    fn test_reader_batches_and_limit() {
        let mut input = String::from("header\n");
        for i in 0..5 {
            input.push_str(&row("Owl", "0.9", &format!("r{}", i), "2025-02-01T08:00:00", "60.1", "24.9"));
            input.push('\n');
        }
        input.push_str(&row("Owl", "0.1", "low", "2025-02-01T08:00:00", "60.1", "24.9"));
        input.push('\n');

        let options = IngestOptions {
            batch_size: 2,
            max_rows: 4,
            ..Default::default()
        };
        let mut reader = TsvReader::new(input.as_bytes(), options);

        assert_eq!(reader.next_batch().unwrap().unwrap().len(), 2);
        assert_eq!(reader.next_batch().unwrap().unwrap().len(), 2);
        assert!(reader.next_batch().unwrap().is_none());
        assert_eq!(reader.stats().accepted, 4);
    }

    #[test]
    fn test_empty_input() {
        let mut reader = TsvReader::new("".as_bytes(), IngestOptions::default());
        assert!(matches!(
            reader.next_batch(),
            Err(IngestionError::EmptyInput(_))
        ));
    }
}
