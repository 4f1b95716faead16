//! Error types for the ingestion crate.

use sighting_common::SightingError;
use thiserror::Error;

/// Errors that can occur during ingestion.
///
/// Bad rows are not errors; they are skipped and counted in
/// [`IngestStats`](crate::IngestStats).
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Input file is empty: {0}")]
    EmptyInput(String),

    #[error("Failed to write to store: {0}")]
    Store(#[from] SightingError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
