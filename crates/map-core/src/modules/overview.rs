//! Multi-species overview with optional per-species coloring.

use async_trait::async_trait;
use std::collections::BTreeMap;

use encoding::SpeciesColorAssignment;
use sighting_common::SightingResult;
use storage::{CellQuery, SpeciesFilter};

use crate::assembler::{AlphaPolicy, CellAssembler, CellColor, TooltipStyle, ORANGE};
use crate::context::ModuleContext;
use crate::histogram::build_histogram;
use crate::registry::MapModule;
use crate::view::ModuleView;

pub struct Overview;

#[async_trait]
impl MapModule for Overview {
    fn name(&self) -> &str {
        "overview"
    }

    fn title(&self) -> Option<&str> {
        Some("Sightings Overview")
    }

    fn description(&self) -> Option<&str> {
        Some("All sightings per grid cell, optionally filtered and colored by species.")
    }

    async fn render(&self, ctx: &ModuleContext<'_>) -> SightingResult<ModuleView> {
        let species = ctx.species_list().await;
        if species.is_empty() {
            return Ok(ModuleView::empty_state());
        }

        let mut selected: Vec<String> = ctx
            .param_values("species")
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .collect();
        selected.sort();
        selected.dedup();

        let by_species = ctx.param("color_mode") == Some("species");
        let controls = ctx.map_controls();
        let opacity = ctx.opacity();
        let filter = SpeciesFilter::from_selection(&selected, &species.names);

        let cells = ctx.query_cells(&CellQuery::new(filter.clone())).await?;
        let weeks = ctx.query_weekly_counts(&filter).await?;

        // Colors come from the full list so a species keeps its color
        // whatever else is selected.
        let colors = SpeciesColorAssignment::from_species(&species.names);
        let color = if by_species {
            CellColor::BySpecies {
                colors: &colors,
                fallback: ORANGE,
            }
        } else {
            CellColor::Fixed(ORANGE)
        };

        let assembler = CellAssembler::new(
            color,
            AlphaPolicy::CountScaled { opacity },
            TooltipStyle::Summary,
            controls.radius(),
        );
        let points = assembler.assemble(&cells);

        let mut view = ModuleView::new(&species, ctx.counts().as_map().clone(), controls);
        view.map_html = Some(ctx.render_map(&points, &controls)?);
        view.selected = selected;
        view.result_count = cells.iter().map(|c| c.count).sum();
        view.cell_count = cells.len();
        view.histogram = build_histogram(&weeks);

        let mut view = view
            .with_extra("color_mode", if by_species { "species" } else { "single" })
            .with_extra("opacity", opacity);
        if by_species {
            let legend: BTreeMap<&str, String> =
                colors.iter().map(|(name, rgb)| (name, rgb.to_css())).collect();
            view = view.with_extra("species_colors", serde_json::json!(legend));
        }

        Ok(view)
    }
}
