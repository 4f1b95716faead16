//! Per-request capability context handed to modules.

use tracing::{debug, warn};

use sighting_common::{AggregatedCell, DayCell, RenderPoint, SightingResult, WeekCount};
use storage::{CellQuery, SightingStore, SpeciesCaches, SpeciesCounts, SpeciesFilter, SpeciesProportions};

use crate::controls::{parse_opacity, MapControls};
use crate::html::MapRenderer;
use crate::params::RequestParams;
use crate::species::SpeciesList;
use crate::spread::{SpreadSeries, SpreadSettings};

/// What a module may use while rendering one request.
///
/// Everything is borrowed from shared read-only state; a context lives for
/// one request only.
pub struct ModuleContext<'a> {
    module: &'a str,
    params: &'a RequestParams,
    store: &'a dyn SightingStore,
    caches: &'a SpeciesCaches,
    renderer: &'a MapRenderer,
}

impl<'a> ModuleContext<'a> {
    pub fn new(
        module: &'a str,
        params: &'a RequestParams,
        store: &'a dyn SightingStore,
        caches: &'a SpeciesCaches,
        renderer: &'a MapRenderer,
    ) -> Self {
        Self {
            module,
            params,
            store,
            caches,
            renderer,
        }
    }

    pub fn module_name(&self) -> &str {
        self.module
    }

    /// First value of a request parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key)
    }

    /// Every value of a repeated request parameter.
    pub fn param_values(&self, key: &str) -> Vec<&str> {
        self.params.get_all(key)
    }

    pub fn params(&self) -> &RequestParams {
        self.params
    }

    /// Species ordered by descending observed count.
    ///
    /// Falls back to the count cache when the store is unreachable.
    pub async fn species_list(&self) -> SpeciesList {
        match self.store.distinct_species().await {
            Ok(names) => SpeciesList::ordered(names, self.counts(), false),
            Err(e) => {
                warn!(
                    module = self.module,
                    backend = self.store.backend(),
                    error = %e,
                    "Species query failed, falling back to count cache"
                );
                metrics::counter!("map_species_fallback_total").increment(1);
                SpeciesList::ordered(self.counts().species(), self.counts(), true)
            }
        }
    }

    pub fn map_controls(&self) -> MapControls {
        MapControls::from_params(self.params)
    }

    pub fn opacity(&self) -> f64 {
        parse_opacity(self.params.get("opacity"))
    }

    pub fn spread_settings(&self) -> SpreadSettings {
        SpreadSettings::from_params(self.params)
    }

    pub fn counts(&self) -> &SpeciesCounts {
        &self.caches.counts
    }

    pub fn proportions(&self) -> &SpeciesProportions {
        &self.caches.proportions
    }

    pub async fn query_cells(&self, query: &CellQuery) -> SightingResult<Vec<AggregatedCell>> {
        let cells = self.store.aggregate_cells(query).await?;
        debug!(module = self.module, cells = cells.len(), "Aggregated cells");
        Ok(cells)
    }

    pub async fn query_weekly_counts(&self, filter: &SpeciesFilter) -> SightingResult<Vec<WeekCount>> {
        self.store.weekly_counts(filter).await
    }

    pub async fn query_day_cells(&self, filter: &SpeciesFilter) -> SightingResult<Vec<DayCell>> {
        self.store.day_cells(filter).await
    }

    /// Map document for assembled points.
    pub fn render_map(&self, points: &[RenderPoint], controls: &MapControls) -> SightingResult<String> {
        self.renderer.render_points(points, controls)
    }

    /// Animated map document for a spread series.
    pub fn render_spread_map(
        &self,
        series: &SpreadSeries,
        controls: &MapControls,
        settings: &SpreadSettings,
        color: [u8; 3],
    ) -> SightingResult<String> {
        self.renderer.render_spread(series, controls, settings, color)
    }
}
