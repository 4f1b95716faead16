//! Day-of-year rainbow.
//!
//! Days 1-181 (Jan 1 to Jun 30 in a common year) run red to violet. Later
//! days are drawn white instead of wrapping back into the gradient.

use sighting_common::Rgb;

use crate::conversion::hsv_to_rgb;

/// Last day drawn on the gradient.
pub const LAST_GRADIENT_DAY: u32 = 181;

/// Hue reached on [`LAST_GRADIENT_DAY`].
pub const MAX_HUE: f64 = 0.83;

/// Hue for `day`, or `None` for days past the gradient. Days below 1 are
/// treated as day 1.
pub fn day_of_year_hue(day: u32) -> Option<f64> {
    if day > LAST_GRADIENT_DAY {
        return None;
    }
    let day = day.max(1);
    Some((day - 1) as f64 / (LAST_GRADIENT_DAY - 1) as f64 * MAX_HUE)
}

/// Color for a day of year.
pub fn day_of_year_to_rgb(day: u32) -> Rgb {
    match day_of_year_hue(day) {
        Some(hue) => hsv_to_rgb(hue, 1.0, 1.0),
        None => Rgb::WHITE,
    }
}
