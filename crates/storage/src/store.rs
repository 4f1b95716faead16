//! Sighting store abstraction.

use async_trait::async_trait;
use std::collections::BTreeMap;

use sighting_common::{AggregatedCell, DayCell, SightingResult, WeekCount};

use crate::query::{CellQuery, SpeciesFilter};

/// Read access to the sighting store.
///
/// Every aggregate is computed by the store; callers never re-aggregate rows.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; one store is shared by all requests.
#[async_trait]
pub trait SightingStore: Send + Sync {
    /// Backend name for logs and readiness output.
    fn backend(&self) -> &'static str;

    /// Check that the store is reachable.
    async fn ping(&self) -> SightingResult<()>;

    /// All species names, alphabetically.
    async fn distinct_species(&self) -> SightingResult<Vec<String>>;

    /// Record count per species.
    async fn species_counts(&self) -> SightingResult<BTreeMap<String, u64>>;

    /// One aggregated row per (latitude, longitude) cell.
    async fn aggregate_cells(&self, query: &CellQuery) -> SightingResult<Vec<AggregatedCell>>;

    /// Record counts per Monday-keyed week, ascending.
    async fn weekly_counts(&self, filter: &SpeciesFilter) -> SightingResult<Vec<WeekCount>>;

    /// Record counts per (cell, day-of-year), ordered by day ascending.
    async fn day_cells(&self, filter: &SpeciesFilter) -> SightingResult<Vec<DayCell>>;
}
