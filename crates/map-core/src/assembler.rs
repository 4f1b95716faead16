//! Cell assembly: aggregated rows plus an encoding become render points.

use chrono::Datelike;
use encoding::{
    day_of_year_to_rgb, observed_expected_ratio, ratio_to_rainbow_with_cap,
    SpeciesColorAssignment,
};
use sighting_common::{format_date_range, AggregatedCell, RenderPoint, Rgb};

/// Single-color and fallback fill.
pub const ORANGE: Rgb = Rgb::new(255, 140, 0);

/// Fill of the single-species map.
pub const CYAN: Rgb = Rgb::new(38, 194, 255);

/// Alpha used by encodings that do not scale with count.
pub const FIXED_ALPHA: u8 = 200;

/// `round(255 × min(1, opacity × count))`
pub fn count_scaled_alpha(opacity: f64, count: u64) -> u8 {
    let intensity = (opacity * count as f64).clamp(0.0, 1.0);
    (255.0 * intensity).round() as u8
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlphaPolicy {
    /// Denser cells are more opaque.
    CountScaled { opacity: f64 },
    Fixed(u8),
}

impl AlphaPolicy {
    pub fn alpha(&self, count: u64) -> u8 {
        match *self {
            AlphaPolicy::CountScaled { opacity } => count_scaled_alpha(opacity, count),
            AlphaPolicy::Fixed(a) => a,
        }
    }
}

/// Per-cell fill color.
#[derive(Debug, Clone, Copy)]
pub enum CellColor<'a> {
    Fixed(Rgb),
    /// Single-species cells take their species color, mixed cells are white.
    BySpecies {
        colors: &'a SpeciesColorAssignment,
        fallback: Rgb,
    },
    /// Color by the cell's earliest day-of-year.
    DayOfYear,
    /// Color by the cell's observed share of one species against its
    /// expected share. `expected` is already floored.
    ObservedExpected { expected: f64, cap: f64 },
}

impl CellColor<'_> {
    pub fn color(&self, cell: &AggregatedCell) -> Rgb {
        match self {
            CellColor::Fixed(c) => *c,
            CellColor::BySpecies { colors, fallback } => match cell.single_species() {
                Some(species) => colors.get(species).unwrap_or(*fallback),
                None => Rgb::WHITE,
            },
            CellColor::DayOfYear => {
                day_of_year_to_rgb(cell.min_day.unwrap_or_else(|| cell.earliest.ordinal()))
            }
            CellColor::ObservedExpected { expected, cap } => {
                let (_, ratio) = cell_ratio(cell, *expected);
                ratio_to_rainbow_with_cap(ratio, *cap)
            }
        }
    }
}

/// (observed proportion, observed/expected ratio) for a cell with a
/// species sub-count. A cell without a sub-count counts as zero observed.
pub fn cell_ratio(cell: &AggregatedCell, expected: f64) -> (f64, f64) {
    let observed = cell.species_count.unwrap_or(0) as f64 / cell.count.max(1) as f64;
    (observed, observed_expected_ratio(observed, expected))
}

/// Tooltip layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TooltipStyle {
    /// `{count} records` and the date range.
    Brief,
    /// Count, species count, the sorted species line and the date range.
    Summary,
    /// Sub-count share and how far it sits from the expected share.
    Ratio { expected: f64 },
}

impl TooltipStyle {
    pub fn text(&self, cell: &AggregatedCell) -> String {
        let range = format_date_range(cell.earliest, cell.latest);
        match self {
            TooltipStyle::Brief => format!("{} records\n{}", cell.count, range),
            TooltipStyle::Summary => format!(
                "{} records | {} species\n{}\n{}",
                cell.count,
                cell.species.len(),
                cell.species.join(", "),
                range
            ),
            TooltipStyle::Ratio { expected } => {
                let (observed, ratio) = cell_ratio(cell, *expected);
                format!(
                    "{}/{} records ({:.1}%)\n{:.1}× expected",
                    cell.species_count.unwrap_or(0),
                    cell.count,
                    observed * 100.0,
                    ratio
                )
            }
        }
    }
}

/// Joins cells with one encoding and the display parameters.
#[derive(Debug, Clone, Copy)]
pub struct CellAssembler<'a> {
    pub color: CellColor<'a>,
    pub alpha: AlphaPolicy,
    pub tooltip: TooltipStyle,
    pub radius: u32,
}

impl<'a> CellAssembler<'a> {
    pub fn new(color: CellColor<'a>, alpha: AlphaPolicy, tooltip: TooltipStyle, radius: u32) -> Self {
        Self {
            color,
            alpha,
            tooltip,
            radius,
        }
    }

    pub fn point(&self, cell: &AggregatedCell) -> RenderPoint {
        let rgb = self.color.color(cell);
        RenderPoint::new(
            cell.latitude,
            cell.longitude,
            rgb.with_alpha(self.alpha.alpha(cell.count)),
            self.radius,
            self.tooltip.text(cell),
        )
    }

    /// One point per cell, in input order.
    pub fn assemble(&self, cells: &[AggregatedCell]) -> Vec<RenderPoint> {
        cells.iter().map(|c| self.point(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, m, d)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn cell(count: u64, species: &[&str]) -> AggregatedCell {
        AggregatedCell::new(
            65.0,
            26.0,
            count,
            species.iter().map(|s| s.to_string()).collect(),
            ts(1, 1),
            ts(1, 10),
        )
        .unwrap()
    }

    // ============================================================================
    // Alpha
    // ============================================================================

    #[test]
    fn test_alpha_saturates() {
        assert_eq!(count_scaled_alpha(0.5, 3), 255);
        assert_eq!(count_scaled_alpha(0.5, 2), 255);
    }

    #[test]
    fn test_alpha_partial() {
        assert_eq!(count_scaled_alpha(0.1, 1), 26);
        assert_eq!(count_scaled_alpha(0.5, 1), 128);
    }

    #[test]
    fn test_alpha_zero_opacity() {
        assert_eq!(count_scaled_alpha(0.0, 100), 0);
    }

    #[test]
    fn test_fixed_alpha_ignores_count() {
        assert_eq!(AlphaPolicy::Fixed(FIXED_ALPHA).alpha(1), 200);
        assert_eq!(AlphaPolicy::Fixed(FIXED_ALPHA).alpha(10_000), 200);
    }

    // ============================================================================
    // Colors
    // ============================================================================

    #[test]
    fn test_mixed_cell_is_white() {
        let colors = SpeciesColorAssignment::from_species(["Fox", "Owl"]);
        let by_species = CellColor::BySpecies {
            colors: &colors,
            fallback: ORANGE,
        };

        assert_eq!(by_species.color(&cell(2, &["Fox", "Owl"])), Rgb::WHITE);
        assert_eq!(
            by_species.color(&cell(2, &["Owl"])),
            colors.get("Owl").unwrap()
        );
    }

    #[test]
    fn test_unknown_species_uses_fallback() {
        let colors = SpeciesColorAssignment::from_species(["Fox"]);
        let by_species = CellColor::BySpecies {
            colors: &colors,
            fallback: ORANGE,
        };
        assert_eq!(by_species.color(&cell(1, &["Lynx"])), ORANGE);
    }

    #[test]
    fn test_day_of_year_color_uses_min_day() {
        let early = cell(1, &["Fox"]).with_min_day(1);
        let late = cell(1, &["Fox"]).with_min_day(200);
        assert_eq!(CellColor::DayOfYear.color(&early), Rgb::new(255, 0, 0));
        assert_eq!(CellColor::DayOfYear.color(&late), Rgb::WHITE);
    }

    #[test]
    fn test_ratio_color() {
        // 5 of 10 records against an expected 0.1 share: ratio 5.0, the cap.
        let c = cell(10, &["Fox", "Owl"]).with_species_count(5);
        let color = CellColor::ObservedExpected {
            expected: 0.1,
            cap: 5.0,
        };
        assert_eq!(color.color(&c), Rgb::new(255, 0, 0));
    }

    // ============================================================================
    // Tooltips
    // ============================================================================

    #[test]
    fn test_brief_tooltip() {
        assert_eq!(
            TooltipStyle::Brief.text(&cell(3, &["Fox"])),
            "3 records\n2025-01-01 — 2025-01-10"
        );
    }

    #[test]
    fn test_summary_tooltip() {
        assert_eq!(
            TooltipStyle::Summary.text(&cell(4, &["Owl", "Fox"])),
            "4 records | 2 species\nFox, Owl\n2025-01-01 — 2025-01-10"
        );
    }

    #[test]
    fn test_ratio_tooltip() {
        let c = cell(8, &["Fox", "Owl"]).with_species_count(2);
        assert_eq!(
            TooltipStyle::Ratio { expected: 0.1 }.text(&c),
            "2/8 records (25.0%)\n2.5× expected"
        );
    }

    // ============================================================================
    // Assembly
    // ============================================================================

    #[test]
    fn test_assemble_point() {
        let assembler = CellAssembler::new(
            CellColor::Fixed(ORANGE),
            AlphaPolicy::CountScaled { opacity: 0.5 },
            TooltipStyle::Brief,
            6,
        );
        let points = assembler.assemble(&[cell(3, &["Fox"])]);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].color, [255, 140, 0, 255]);
        assert_eq!(points[0].radius, 6);
        assert_eq!((points[0].latitude, points[0].longitude), (65.0, 26.0));
    }

    #[test]
    fn test_radius_never_zero() {
        let assembler = CellAssembler::new(
            CellColor::Fixed(ORANGE),
            AlphaPolicy::Fixed(FIXED_ALPHA),
            TooltipStyle::Brief,
            0,
        );
        assert_eq!(assembler.point(&cell(1, &["Fox"])).radius, 1);
    }
}
