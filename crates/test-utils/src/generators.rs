//! Deterministic sighting generators.
//!
//! Generated records walk a fixed grid and calendar so tests can assert on
//! exact counts without fixture files.

use chrono::{Duration, NaiveDateTime};

use sighting_common::SightingRecord;

use crate::fixtures::{noon, sighting};

/// Grid step used by the generators, matching the upstream quantization.
pub const GRID_STEP: f64 = 0.1;

/// `per_species` records for each species, cycling over `cells` grid cells
/// anchored at (60.0, 20.0) and one day apart starting 2025-01-01.
///
/// Record `i` of a species lands in cell `i % cells` on day `i + 1`.
pub fn generate_sightings(species: &[&str], per_species: usize, cells: usize) -> Vec<SightingRecord> {
    let cells = cells.max(1);
    let start = noon(2025, 1, 1);
    let mut records = Vec::with_capacity(species.len() * per_species);

    for name in species {
        for i in 0..per_species {
            let (lat, lon) = grid_cell(i % cells);
            let time = start + Duration::days(i as i64);
            records.push(sighting(&format!("{}-{}", name, i), name, time, lat, lon));
        }
    }
    records
}

/// Records for one species on the given timestamps, all in one cell.
pub fn sightings_at(species: &str, times: &[NaiveDateTime], (lat, lon): (f64, f64)) -> Vec<SightingRecord> {
    times
        .iter()
        .enumerate()
        .map(|(i, &t)| sighting(&format!("{}-{}", species, i), species, t, lat, lon))
        .collect()
}

/// Coordinates of the `index`-th generated cell: rows of ten cells.
pub fn grid_cell(index: usize) -> (f64, f64) {
    let row = (index / 10) as f64;
    let col = (index % 10) as f64;
    (
        round_to_grid(60.0 + row * GRID_STEP),
        round_to_grid(20.0 + col * GRID_STEP),
    )
}

fn round_to_grid(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
