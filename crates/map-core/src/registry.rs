//! Map module trait and the startup registry.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use sighting_common::SightingResult;

use crate::context::ModuleContext;
use crate::view::ModuleView;

/// One visualization, served under `/modules/{name}`.
#[async_trait]
pub trait MapModule: Send + Sync {
    /// Unique key and URL segment.
    fn name(&self) -> &str;

    fn title(&self) -> Option<&str> {
        None
    }

    fn description(&self) -> Option<&str> {
        None
    }

    async fn render(&self, ctx: &ModuleContext<'_>) -> SightingResult<ModuleView>;
}

/// A registered module with its display defaults applied.
#[derive(Clone, Serialize)]
pub struct ModuleDescriptor {
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(skip)]
    module: Arc<dyn MapModule>,
}

impl ModuleDescriptor {
    fn new(module: Arc<dyn MapModule>) -> Self {
        let name = module.name().to_string();
        Self {
            title: module.title().unwrap_or(&name).to_string(),
            description: module.description().unwrap_or_default().to_string(),
            name,
            module,
        }
    }

    /// Render the module and stamp the view with this descriptor.
    pub async fn render(&self, ctx: &ModuleContext<'_>) -> SightingResult<ModuleView> {
        let mut view = self.module.render(ctx).await?;
        view.module = self.name.clone();
        view.title = self.title.clone();
        Ok(view)
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("description", &self.description)
            .finish()
    }
}

/// Modules available to the shell. Built once; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<ModuleDescriptor>,
    index: HashMap<String, usize>,
}

impl ModuleRegistry {
    pub fn builder() -> ModuleRegistryBuilder {
        ModuleRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.index.get(name).map(|&i| &self.modules[i])
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[derive(Default)]
pub struct ModuleRegistryBuilder {
    modules: Vec<Arc<dyn MapModule>>,
}

impl ModuleRegistryBuilder {
    pub fn register<M: MapModule + 'static>(self, module: M) -> Self {
        self.register_arc(Arc::new(module))
    }

    pub fn register_arc(mut self, module: Arc<dyn MapModule>) -> Self {
        self.modules.push(module);
        self
    }

    /// Freeze the registry. Invalid names and repeated names are logged and
    /// skipped; the first module registered under a name wins.
    pub fn build(self) -> ModuleRegistry {
        let mut registry = ModuleRegistry::default();

        for module in self.modules {
            let name = module.name();
            if !is_valid_name(name) {
                warn!(module = name, "Skipping module with invalid name");
                continue;
            }
            if registry.index.contains_key(name) {
                warn!(module = name, "Duplicate module name, ignoring later registration");
                continue;
            }

            let descriptor = ModuleDescriptor::new(module);
            info!(module = %descriptor.name, title = %descriptor.title, "Registered map module");
            registry
                .index
                .insert(descriptor.name.clone(), registry.modules.len());
            registry.modules.push(descriptor);
        }

        registry
    }
}

/// Names double as URL segments: lowercase ASCII, digits, `_` and `-`.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("species_map"));
        assert!(is_valid_name("map-2"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("Species Map"));
        assert!(!is_valid_name("a/b"));
    }
}
