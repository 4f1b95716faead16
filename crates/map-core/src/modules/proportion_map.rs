//! Where a species is over- or under-represented relative to its overall share.

use async_trait::async_trait;

use encoding::{floored_expected, DEFAULT_RATIO_CAP, EXPECTED_FLOOR};
use sighting_common::SightingResult;
use storage::{CellQuery, SpeciesFilter};

use crate::assembler::{AlphaPolicy, CellAssembler, CellColor, TooltipStyle, FIXED_ALPHA};
use crate::context::ModuleContext;
use crate::modules::single_species;
use crate::registry::MapModule;
use crate::view::ModuleView;

pub struct ProportionMap;

#[async_trait]
impl MapModule for ProportionMap {
    fn name(&self) -> &str {
        "proportion_map"
    }

    fn title(&self) -> Option<&str> {
        Some("Proportion Map")
    }

    fn description(&self) -> Option<&str> {
        Some("Share of a species in each cell against its share of all sightings.")
    }

    async fn render(&self, ctx: &ModuleContext<'_>) -> SightingResult<ModuleView> {
        let species = ctx.species_list().await;
        let Some(selected) = single_species(ctx, &species) else {
            return Ok(ModuleView::empty_state());
        };

        let controls = ctx.map_controls();
        let expected = floored_expected(ctx.proportions().expected(&selected, EXPECTED_FLOOR));

        // Totals span every species; only cells where the selected one occurs are kept.
        let cells = ctx
            .query_cells(&CellQuery::new(SpeciesFilter::All).with_species_count(selected.clone()))
            .await?;

        let points = CellAssembler::new(
            CellColor::ObservedExpected {
                expected,
                cap: DEFAULT_RATIO_CAP,
            },
            AlphaPolicy::Fixed(FIXED_ALPHA),
            TooltipStyle::Ratio { expected },
            controls.radius(),
        )
        .assemble(&cells);

        let mut view = ModuleView::new(&species, ctx.counts().as_map().clone(), controls);
        view.map_html = Some(ctx.render_map(&points, &controls)?);
        view.selected = vec![selected];
        view.result_count = cells.iter().filter_map(|c| c.species_count).sum();
        view.cell_count = cells.len();

        Ok(view
            .with_extra("expected_proportion", expected)
            .with_extra("ratio_cap", DEFAULT_RATIO_CAP))
    }
}
