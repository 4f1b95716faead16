//! Tests for file ingestion and summary cache generation.

use std::io::Write;

use ingestion::{write_caches, IngestOptions, Ingester};
use sighting_common::SightingRecord;
use storage::SpeciesCaches;

const HEADER: &str = "species\tprediction\tc2\tc3\tc4\tresult_id\tc6\tc7\tc8\tc9\ttime\tc11\tc12\tc13\tc14\tc15\tc16\tlat\tlon";

fn row(species: &str, prediction: f64, id: &str, time: &str, lat: f64, lon: f64) -> String {
    let mut fields: Vec<String> = vec![String::new(); 19];
    fields[0] = species.to_string();
    fields[1] = prediction.to_string();
    fields[5] = id.to_string();
    fields[10] = time.to_string();
    fields[17] = lat.to_string();
    fields[18] = lon.to_string();
    fields.join("\t")
}

fn sample_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let rows = [
        row("Fox", 0.95, "a", "2025-01-01T06:00:00.125000", 65.0, 26.0),
        row("Fox", 0.85, "b", "2025-01-04T06:00:00", 65.0, 26.0),
        row("Fox", 0.40, "c", "2025-01-05T06:00:00", 65.0, 26.0),
        row("Owl", 0.99, "d", "2025-01-08T22:10:00", 60.1, 24.9),
        row("Owl", 0.99, "e", "2023-01-08T22:10:00", 60.1, 24.9),
        row("Wren", 0.99, "", "2025-01-08T22:10:00", 60.1, 24.9),
    ];
    writeln!(file, "{}", HEADER).unwrap();
    for r in rows {
        writeln!(file, "{}", r).unwrap();
    }
    file
}

#[tokio::test]
async fn test_ingest_file_filters_rows() {
    let file = sample_file();
    let ingester = Ingester::new(IngestOptions {
        batch_size: 2,
        ..Default::default()
    })
    .unwrap();

    let mut sink: Vec<SightingRecord> = Vec::new();
    let result = ingester.ingest_file(file.path(), &mut sink).await.unwrap();

    assert_eq!(result.rows_written, 3);
    assert_eq!(result.batches, 2);
    assert_eq!(result.stats.rows_read, 6);
    assert_eq!(result.stats.low_confidence, 1);
    assert_eq!(result.stats.outside_years, 1);
    assert_eq!(result.stats.missing_field, 1);

    let ids: Vec<&str> = sink.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "d"]);
    assert_eq!(sink[2].day_of_year, 8);
}

#[tokio::test]
async fn test_caches_round_trip_through_dir() {
    let file = sample_file();
    let ingester = Ingester::new(IngestOptions::default()).unwrap();
    let mut sink: Vec<SightingRecord> = Vec::new();
    let result = ingester.ingest_file(file.path(), &mut sink).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    write_caches(dir.path(), result.tally.counts().as_map().clone(), &result.tally.proportions()).unwrap();

    let caches = SpeciesCaches::load_from_dir(dir.path());
    assert_eq!(caches.counts.get("Fox"), 2);
    assert_eq!(caches.counts.get("Owl"), 1);
    assert_eq!(caches.proportions.get("Fox"), Some(0.6667));
    assert_eq!(caches.proportions.get("Owl"), Some(0.3333));
}

#[test]
fn test_invalid_options_rejected() {
    let options = IngestOptions {
        batch_size: 0,
        ..Default::default()
    };
    assert!(Ingester::new(options).is_err());
}

#[tokio::test]
async fn test_missing_file() {
    let ingester = Ingester::new(IngestOptions::default()).unwrap();
    let mut sink: Vec<SightingRecord> = Vec::new();
    let err = ingester
        .ingest_file("/nonexistent/sightings.tsv", &mut sink)
        .await
        .unwrap_err();
    assert!(matches!(err, ingestion::IngestionError::FileRead(_)));
}
