//! Observed/expected ratio rainbow.

use sighting_common::Rgb;

use crate::conversion::hsv_to_rgb;

/// Ratio at or above which cells are drawn full red.
pub const DEFAULT_RATIO_CAP: f64 = 5.0;

/// Lower bound on expected proportion. Keeps ratios for very rare species finite.
pub const EXPECTED_FLOOR: f64 = 0.005;

/// Hue for ratio 0.
const BLUE_HUE: f64 = 0.667;

/// Rainbow color for `ratio` with the default cap: blue at 0, red at the cap.
pub fn ratio_to_rainbow(ratio: f64) -> Rgb {
    ratio_to_rainbow_with_cap(ratio, DEFAULT_RATIO_CAP)
}

/// Rainbow color for `ratio`, saturating at `cap`.
///
/// A non-positive cap falls back to [`DEFAULT_RATIO_CAP`]; NaN ratios map to blue.
pub fn ratio_to_rainbow_with_cap(ratio: f64, cap: f64) -> Rgb {
    let cap = if cap > 0.0 { cap } else { DEFAULT_RATIO_CAP };
    let t = if ratio.is_nan() {
        0.0
    } else {
        (ratio / cap).clamp(0.0, 1.0)
    };
    hsv_to_rgb((1.0 - t) * BLUE_HUE, 1.0, 1.0)
}

/// `observed / max(expected, EXPECTED_FLOOR)`.
pub fn observed_expected_ratio(observed: f64, expected: f64) -> f64 {
    observed / floored_expected(expected)
}

/// Expected proportion with [`EXPECTED_FLOOR`] applied.
pub fn floored_expected(expected: f64) -> f64 {
    if expected.is_nan() {
        EXPECTED_FLOOR
    } else {
        expected.max(EXPECTED_FLOOR)
    }
}
