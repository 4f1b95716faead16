//! Storage for sighting-map services.
//!
//! Provides:
//! - An aggregate query builder with species filter pushdown
//! - The `SightingStore` trait with PostgreSQL and in-memory backends
//! - Species summary caches loaded from disk at startup

pub mod memory;
pub mod postgres;
pub mod query;
pub mod species_cache;
pub mod store;

pub use memory::MemorySightingStore;
pub use postgres::PgSightingStore;
pub use query::{BuiltQuery, CellQuery, SpeciesFilter, TABLE_NAME};
pub use species_cache::{
    SpeciesCaches, SpeciesCounts, SpeciesProportions, SPECIES_COUNTS_FILE,
    SPECIES_PROPORTIONS_FILE,
};
pub use store::SightingStore;
