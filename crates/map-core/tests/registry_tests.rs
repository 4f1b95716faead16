//! Tests for module registration.

use async_trait::async_trait;
use map_core::{builtin_registry, MapModule, ModuleContext, ModuleRegistry, ModuleView};
use sighting_common::SightingResult;

struct Bare(&'static str);

#[async_trait]
impl MapModule for Bare {
    fn name(&self) -> &str {
        self.0
    }

    async fn render(&self, _ctx: &ModuleContext<'_>) -> SightingResult<ModuleView> {
        Ok(ModuleView::default())
    }
}

struct Titled;

#[async_trait]
impl MapModule for Titled {
    fn name(&self) -> &str {
        "heatmap"
    }

    fn title(&self) -> Option<&str> {
        Some("Heat Map")
    }

    async fn render(&self, _ctx: &ModuleContext<'_>) -> SightingResult<ModuleView> {
        Ok(ModuleView::default())
    }
}

#[test]
fn test_missing_title_and_description_default() {
    let registry = ModuleRegistry::builder().register(Bare("density")).build();
    let descriptor = registry.get("density").unwrap();

    assert_eq!(descriptor.title, "density");
    assert_eq!(descriptor.description, "");
}

#[test]
fn test_duplicate_name_keeps_first() {
    let registry = ModuleRegistry::builder()
        .register(Titled)
        .register(Bare("heatmap"))
        .build();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("heatmap").unwrap().title, "Heat Map");
}

#[test]
fn test_invalid_name_skipped() {
    let registry = ModuleRegistry::builder()
        .register(Bare("not/a/segment"))
        .register(Bare("ok"))
        .build();

    assert_eq!(registry.len(), 1);
    assert!(registry.get("ok").is_some());
}

#[test]
fn test_unknown_module() {
    assert!(builtin_registry().get("nope").is_none());
}

#[test]
fn test_builtin_order() {
    let registry = builtin_registry();
    let names: Vec<&str> = registry
        .descriptors()
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["overview", "species_map", "temporal_map", "proportion_map", "spread_map"]
    );
}

#[test]
fn test_descriptor_json() {
    let registry = ModuleRegistry::builder().register(Titled).build();
    let json = serde_json::to_value(registry.descriptors()).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{"name": "heatmap", "title": "Heat Map", "description": ""}])
    );
}
