//! Golden-ratio hue distribution for per-species colors.

use serde::Serialize;
use sighting_common::Rgb;
use std::collections::BTreeMap;

use crate::conversion::hls_to_rgb;

/// Golden ratio conjugate. Successive multiples modulo 1.0 spread hues
/// evenly around the wheel for any number of species.
pub const GOLDEN_RATIO_CONJUGATE: f64 = 0.618033988749895;

/// Saturation of species colors.
pub const SPECIES_SATURATION: f64 = 0.6;

/// Lightness of species colors. Kept high for contrast on a dark map.
pub const SPECIES_LIGHTNESS: f64 = 0.9;

/// Mapping from species name to its assigned color.
///
/// Hues are assigned over the sorted, de-duplicated species list, so the
/// assignment depends only on the set of names and not on input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpeciesColorAssignment {
    colors: BTreeMap<String, Rgb>,
}

impl SpeciesColorAssignment {
    pub fn from_species<I, S>(species: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = species.into_iter().map(|s| s.as_ref().to_string()).collect();
        names.sort();
        names.dedup();

        let mut colors = BTreeMap::new();
        let mut hue = 0.0_f64;
        for name in names {
            colors.insert(name, hls_to_rgb(hue, SPECIES_LIGHTNESS, SPECIES_SATURATION));
            hue = (hue + GOLDEN_RATIO_CONJUGATE) % 1.0;
        }

        Self { colors }
    }

    pub fn get(&self, species: &str) -> Option<Rgb> {
        self.colors.get(species).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Iterate in sorted species order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Rgb)> {
        self.colors.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
