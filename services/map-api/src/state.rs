//! Application state for the map API.

use std::sync::Arc;

use map_core::{MapRenderer, ModuleContext, ModuleRegistry, RequestParams};
use storage::{SightingStore, SpeciesCaches};

/// Shared application state. Read-only after startup.
pub struct AppState {
    pub store: Arc<dyn SightingStore>,
    pub caches: SpeciesCaches,
    pub registry: ModuleRegistry,
    pub renderer: MapRenderer,
}

impl AppState {
    pub fn new(
        store: Arc<dyn SightingStore>,
        caches: SpeciesCaches,
        registry: ModuleRegistry,
        renderer: MapRenderer,
    ) -> Self {
        Self {
            store,
            caches,
            registry,
            renderer,
        }
    }

    /// Capability context for one module request.
    pub fn context<'a>(&'a self, module: &'a str, params: &'a RequestParams) -> ModuleContext<'a> {
        ModuleContext::new(module, params, self.store.as_ref(), &self.caches, &self.renderer)
    }
}
