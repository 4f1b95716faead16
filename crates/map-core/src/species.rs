//! Species list ordering.

use serde::Serialize;

use storage::SpeciesCounts;

/// Species available to a request, most observed first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpeciesList {
    pub names: Vec<String>,
    /// True when the store was unreachable and names came from the count cache.
    pub from_cache: bool,
}

impl SpeciesList {
    /// Order `names` by descending cached count, alphabetically among ties.
    pub fn ordered(mut names: Vec<String>, counts: &SpeciesCounts, from_cache: bool) -> Self {
        names.sort();
        names.dedup();
        names.sort_by(|a, b| counts.get(b).cmp(&counts.get(a)));
        Self { names, from_cache }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn contains(&self, species: &str) -> bool {
        self.names.iter().any(|n| n == species)
    }

    /// The most observed species.
    pub fn first(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    /// Names in alphabetical order.
    pub fn alphabetical(&self) -> Vec<String> {
        let mut names = self.names.clone();
        names.sort();
        names
    }
}
