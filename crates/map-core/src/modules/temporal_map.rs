//! Cells colored by the first day of the year a species was seen there.

use async_trait::async_trait;
use chrono::Datelike;

use encoding::day_of_year_to_rgb;
use sighting_common::SightingResult;
use storage::{CellQuery, SpeciesFilter};

use crate::assembler::{AlphaPolicy, CellAssembler, CellColor, TooltipStyle, FIXED_ALPHA};
use crate::context::ModuleContext;
use crate::histogram::build_histogram_with;
use crate::modules::single_species;
use crate::registry::MapModule;
use crate::view::ModuleView;

pub struct TemporalMap;

#[async_trait]
impl MapModule for TemporalMap {
    fn name(&self) -> &str {
        "temporal_map"
    }

    fn title(&self) -> Option<&str> {
        Some("Temporal Map")
    }

    fn description(&self) -> Option<&str> {
        Some("Earliest sighting day per cell, red in January through violet at the end of June.")
    }

    async fn render(&self, ctx: &ModuleContext<'_>) -> SightingResult<ModuleView> {
        let species = ctx.species_list().await;
        let Some(selected) = single_species(ctx, &species) else {
            return Ok(ModuleView::empty_state());
        };

        let controls = ctx.map_controls();
        let filter = SpeciesFilter::Exact(selected.clone());
        let cells = ctx
            .query_cells(&CellQuery::new(filter.clone()).with_min_day())
            .await?;
        let weeks = ctx.query_weekly_counts(&filter).await?;

        let points = CellAssembler::new(
            CellColor::DayOfYear,
            AlphaPolicy::Fixed(FIXED_ALPHA),
            TooltipStyle::Brief,
            controls.radius(),
        )
        .assemble(&cells);

        let mut view = ModuleView::new(&species, ctx.counts().as_map().clone(), controls);
        view.map_html = Some(ctx.render_map(&points, &controls)?);
        view.selected = vec![selected];
        view.result_count = cells.iter().map(|c| c.count).sum();
        view.cell_count = cells.len();
        view.histogram = build_histogram_with(&weeks, |week| Some(day_of_year_to_rgb(week.ordinal())));

        Ok(view)
    }
}
