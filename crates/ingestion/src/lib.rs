//! Sighting ingestion library.
//!
//! Reads the upstream TSV export, keeps confident and complete rows inside
//! the configured year range, and writes them to the sighting store in
//! batches. Also derives the species summary caches the map service loads
//! at startup.
//!
//! Used by the `ingester` service and by `map-api` to seed its in-memory
//! store.

pub mod config;
pub mod error;
mod ingester;
pub mod summary;
pub mod tsv;

// Re-exports
pub use config::IngestOptions;
pub use error::{IngestionError, Result};
pub use ingester::{write_caches, Ingester, IngestionResult, SightingSink};
pub use summary::SpeciesTally;
pub use tsv::{parse_line, IngestStats, SkipReason, TsvReader};
