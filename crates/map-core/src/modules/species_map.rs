use async_trait::async_trait;

use sighting_common::SightingResult;
use storage::{CellQuery, SpeciesFilter};

use crate::assembler::{AlphaPolicy, CellAssembler, CellColor, TooltipStyle, CYAN};
use crate::context::ModuleContext;
use crate::modules::single_species;
use crate::registry::MapModule;
use crate::view::ModuleView;

pub struct SpeciesMap;

#[async_trait]
impl MapModule for SpeciesMap {
    fn name(&self) -> &str {
        "species_map"
    }

    fn title(&self) -> Option<&str> {
        Some("Species Map")
    }

    fn description(&self) -> Option<&str> {
        Some("Where one species has been seen.")
    }

    async fn render(&self, ctx: &ModuleContext<'_>) -> SightingResult<ModuleView> {
        let species = ctx.species_list().await;
        let Some(selected) = single_species(ctx, &species) else {
            return Ok(ModuleView::empty_state());
        };

        let controls = ctx.map_controls();
        let opacity = ctx.opacity();
        let cells = ctx
            .query_cells(&CellQuery::new(SpeciesFilter::Exact(selected.clone())))
            .await?;

        let points = CellAssembler::new(
            CellColor::Fixed(CYAN),
            AlphaPolicy::CountScaled { opacity },
            TooltipStyle::Brief,
            controls.radius(),
        )
        .assemble(&cells);

        let mut view = ModuleView::new(&species, ctx.counts().as_map().clone(), controls);
        view.map_html = Some(ctx.render_map(&points, &controls)?);
        view.selected = vec![selected];
        view.result_count = cells.iter().map(|c| c.count).sum();
        view.cell_count = cells.len();

        Ok(view.with_extra("opacity", opacity))
    }
}
