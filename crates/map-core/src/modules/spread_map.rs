//! Animated spread of a species over the year.

use async_trait::async_trait;

use sighting_common::SightingResult;
use storage::SpeciesFilter;

use crate::assembler::CYAN;
use crate::context::ModuleContext;
use crate::modules::single_species;
use crate::registry::MapModule;
use crate::spread::spread_points;
use crate::view::ModuleView;

pub struct SpreadMap;

#[async_trait]
impl MapModule for SpreadMap {
    fn name(&self) -> &str {
        "spread_map"
    }

    fn title(&self) -> Option<&str> {
        Some("Spread Map")
    }

    fn description(&self) -> Option<&str> {
        Some("Sightings played back day by day.")
    }

    async fn render(&self, ctx: &ModuleContext<'_>) -> SightingResult<ModuleView> {
        let species = ctx.species_list().await;
        let Some(selected) = single_species(ctx, &species) else {
            return Ok(ModuleView::empty_state());
        };

        let controls = ctx.map_controls();
        let settings = ctx.spread_settings();
        let series = spread_points(
            ctx.query_day_cells(&SpeciesFilter::Exact(selected.clone()))
                .await?,
        );

        let mut view = ModuleView::new(&species, ctx.counts().as_map().clone(), controls);
        view.map_html = Some(ctx.render_spread_map(&series, &controls, &settings, CYAN.into())?);
        view.selected = vec![selected];
        view.result_count = series.total_records;
        view.cell_count = series.points.len();

        let mut view = view
            .with_extra("fade_days", settings.fade_days)
            .with_extra("speed", settings.speed);
        if let Some((first, last)) = series.day_range() {
            view = view.with_extra("first_day", first).with_extra("last_day", last);
        }
        Ok(view)
    }
}
