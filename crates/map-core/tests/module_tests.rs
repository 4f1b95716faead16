//! End-to-end tests of the built-in modules over the in-memory store.

use map_core::view::NO_DATA_MESSAGE;
use map_core::{
    builtin_registry, AlphaPolicy, CellAssembler, CellColor, MapRenderer, ModuleContext,
    ModuleView, RequestParams, TooltipStyle,
};
use sighting_common::SightingResult;
use storage::{CellQuery, SightingStore, SpeciesCaches, SpeciesFilter};
use test_utils::{fox_owl_caches, fox_owl_store, UnavailableStore, FOX_CELL};

fn params(pairs: &[(&str, &str)]) -> RequestParams {
    pairs.iter().copied().collect()
}

async fn render(
    module: &str,
    store: &dyn SightingStore,
    caches: &SpeciesCaches,
    params: &RequestParams,
) -> SightingResult<ModuleView> {
    let registry = builtin_registry();
    let renderer = MapRenderer::default();
    let descriptor = registry.get(module).expect("built-in module");
    let ctx = ModuleContext::new(module, params, store, caches, &renderer);
    descriptor.render(&ctx).await
}

// ============================================================================
// Pipeline
// ============================================================================

#[tokio::test]
async fn test_single_species_cell_point() {
    let store = fox_owl_store();
    let caches = fox_owl_caches();
    let renderer = MapRenderer::default();
    let request = RequestParams::default();
    let ctx = ModuleContext::new("species_map", &request, &store, &caches, &renderer);

    let species = ctx.species_list().await;
    assert_eq!(species.names, vec!["Fox", "Owl"]);

    let cells = ctx
        .query_cells(&CellQuery::new(SpeciesFilter::Exact("Fox".into())))
        .await
        .unwrap();
    assert_eq!(cells.len(), 1);
    assert_eq!((cells[0].latitude, cells[0].longitude), FOX_CELL);
    assert_eq!(cells[0].count, 3);

    let points = CellAssembler::new(
        CellColor::Fixed(map_core::assembler::ORANGE),
        AlphaPolicy::CountScaled { opacity: ctx.opacity() },
        TooltipStyle::Brief,
        ctx.map_controls().radius(),
    )
    .assemble(&cells);

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].alpha(), 255);
    assert!(points[0].tooltip.contains("3 records"));
    assert!(points[0].tooltip.contains("2025-01-01 — 2025-01-10"));
}

// ============================================================================
// Built-in modules
// ============================================================================

#[tokio::test]
async fn test_overview_filtered_to_fox() {
    let store = fox_owl_store();
    let caches = fox_owl_caches();
    let view = render("overview", &store, &caches, &params(&[("species", "Fox")]))
        .await
        .unwrap();

    assert_eq!(view.module, "overview");
    assert_eq!(view.title, "Sightings Overview");
    assert_eq!(view.selected, vec!["Fox"]);
    assert_eq!(view.cell_count, 1);
    assert_eq!(view.result_count, 3);
    assert_eq!(view.all_species, vec!["Fox", "Owl"]);

    let html = view.map_html.unwrap();
    assert!(html.contains(r#""color":[255,140,0,255]"#));
    assert!(html.contains(r#""tooltip":"3 records | 1 species\nFox\n2025-01-01 — 2025-01-10""#));

    // 2025-01-01 and 2025-01-04 share the week of 2024-12-30.
    assert_eq!(view.histogram.len(), 2);
    assert_eq!(view.histogram[0].week, "2024-12-30");
    assert_eq!(view.histogram[0].count, 2);
    assert_eq!(view.histogram[0].height_pct, 100.0);
    assert_eq!(view.histogram[1].height_pct, 50.0);
}

#[tokio::test]
async fn test_overview_unfiltered_species_colors() {
    let store = fox_owl_store();
    let caches = fox_owl_caches();
    let view = render("overview", &store, &caches, &params(&[("color_mode", "species")]))
        .await
        .unwrap();

    assert!(view.selected.is_empty());
    assert_eq!(view.cell_count, 2);
    assert_eq!(view.result_count, 4);
    assert_eq!(view.extras["color_mode"], "species");
    // First species in sorted order takes hue 0.
    assert_eq!(view.extras["species_colors"]["Fox"], "rgb(244, 214, 214)");
}

#[tokio::test]
async fn test_species_map_defaults_to_most_observed() {
    let store = fox_owl_store();
    let caches = fox_owl_caches();
    let view = render("species_map", &store, &caches, &params(&[("species", "Lynx")]))
        .await
        .unwrap();

    assert_eq!(view.selected, vec!["Fox"]);
    let html = view.map_html.unwrap();
    assert!(html.contains(r#""color":[38,194,255,255]"#));
    assert!(html.contains(r#""tooltip":"3 records\n2025-01-01 — 2025-01-10""#));
}

#[tokio::test]
async fn test_temporal_map_colors_by_first_day() {
    let store = fox_owl_store();
    let caches = fox_owl_caches();
    let view = render("temporal_map", &store, &caches, &params(&[("species", "Fox")]))
        .await
        .unwrap();

    let html = view.map_html.unwrap();
    assert!(html.contains(r#""color":[255,0,0,200]"#));

    // Week of 2024-12-30 starts on day 365, past the gradient.
    assert_eq!(view.histogram[0].color.as_deref(), Some("rgb(255, 255, 255)"));
    assert!(view.histogram[1]
        .color
        .as_deref()
        .unwrap()
        .starts_with("rgb(255, "));
}

#[tokio::test]
async fn test_proportion_map_ratio_tooltip() {
    let store = fox_owl_store();
    let caches = fox_owl_caches();
    let view = render("proportion_map", &store, &caches, &params(&[("species", "Owl")]))
        .await
        .unwrap();

    assert_eq!(view.cell_count, 1);
    assert_eq!(view.result_count, 1);
    assert_eq!(view.extras["expected_proportion"], 0.25);
    let html = view.map_html.unwrap();
    assert!(html.contains(r#""tooltip":"1/1 records (100.0%)\n4.0× expected""#));
}

#[tokio::test]
async fn test_spread_map_points_in_day_order() {
    let store = fox_owl_store();
    let caches = fox_owl_caches();
    let view = render(
        "spread_map",
        &store,
        &caches,
        &params(&[("species", "Fox"), ("fade_days", "90"), ("speed", "abc")]),
    )
    .await
    .unwrap();

    assert_eq!(view.cell_count, 3);
    assert_eq!(view.result_count, 3);
    assert_eq!(view.extras["fade_days"], 60);
    assert_eq!(view.extras["speed"], 20);
    assert_eq!(view.extras["first_day"], 1);
    assert_eq!(view.extras["last_day"], 10);
    let html = view.map_html.unwrap();
    assert!(html.contains("const POINTS = [[65.0,26.0,1],[65.0,26.0,4],[65.0,26.0,10]];"));
}

// ============================================================================
// Degraded store
// ============================================================================

#[tokio::test]
async fn test_species_list_falls_back_to_cache() {
    let store = UnavailableStore;
    let caches = fox_owl_caches();
    let renderer = MapRenderer::default();
    let request = RequestParams::default();
    let ctx = ModuleContext::new("overview", &request, &store, &caches, &renderer);

    let species = ctx.species_list().await;
    assert!(species.from_cache);
    assert_eq!(species.names, vec!["Fox", "Owl"]);
}

#[tokio::test]
async fn test_query_failure_surfaces_as_unavailable() {
    let caches = fox_owl_caches();
    let err = render("overview", &UnavailableStore, &caches, &RequestParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.http_status_code(), 503);
}

#[tokio::test]
async fn test_empty_state_without_species() {
    let caches = SpeciesCaches::default();
    for module in ["overview", "species_map", "temporal_map", "proportion_map", "spread_map"] {
        let view = render(module, &UnavailableStore, &caches, &RequestParams::default())
            .await
            .unwrap();
        assert!(view.map_html.is_none(), "{} rendered a map", module);
        assert_eq!(view.empty_message.as_deref(), Some(NO_DATA_MESSAGE));
    }
}
