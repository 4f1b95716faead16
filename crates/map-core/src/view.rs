//! Serializable module output.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::controls::MapControls;
use crate::histogram::HistogramBar;
use crate::species::SpeciesList;

/// Shown when neither the store nor the count cache knows any species.
pub const NO_DATA_MESSAGE: &str = "No data yet! Run the ingester to load sightings \
    (cargo run -p ingester -- --data-file <sightings.tsv>), then reload this page.";

/// Everything a page needs to display one module render.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModuleView {
    pub module: String,
    pub title: String,
    /// Standalone map document; `None` in the empty state.
    pub map_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
    /// Every species, most observed first.
    pub all_species: Vec<String>,
    pub species_counts: BTreeMap<String, u64>,
    pub selected: Vec<String>,
    pub species_from_cache: bool,
    /// Records behind the rendered cells.
    pub result_count: u64,
    pub cell_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub histogram: Vec<HistogramBar>,
    pub controls: MapControls,
    /// Module-specific settings echoed back to the page.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, Value>,
}

impl ModuleView {
    pub fn new(species: &SpeciesList, species_counts: BTreeMap<String, u64>, controls: MapControls) -> Self {
        Self {
            all_species: species.names.clone(),
            species_counts,
            species_from_cache: species.from_cache,
            controls,
            ..Self::default()
        }
    }

    /// View with only the no-data message.
    pub fn empty_state() -> Self {
        Self {
            empty_message: Some(NO_DATA_MESSAGE.to_string()),
            ..Self::default()
        }
    }

    pub fn is_empty_state(&self) -> bool {
        self.empty_message.is_some()
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extras.insert(key.to_string(), value.into());
        self
    }
}
