//! Built-in map modules.

mod overview;
mod proportion_map;
mod species_map;
mod spread_map;
mod temporal_map;

pub use overview::Overview;
pub use proportion_map::ProportionMap;
pub use species_map::SpeciesMap;
pub use spread_map::SpreadMap;
pub use temporal_map::TemporalMap;

use crate::context::ModuleContext;
use crate::registry::ModuleRegistry;
use crate::species::SpeciesList;

/// Registry holding every built-in module, in menu order.
pub fn builtin_registry() -> ModuleRegistry {
    ModuleRegistry::builder()
        .register(Overview)
        .register(SpeciesMap)
        .register(TemporalMap)
        .register(ProportionMap)
        .register(SpreadMap)
        .build()
}

/// The species requested by `species`, or the most observed one when the
/// parameter is missing or names an unknown species.
pub(crate) fn single_species(ctx: &ModuleContext<'_>, species: &SpeciesList) -> Option<String> {
    match ctx.params().get_non_empty("species") {
        Some(requested) if species.contains(requested) => Some(requested.to_string()),
        _ => species.first().map(str::to_string),
    }
}
