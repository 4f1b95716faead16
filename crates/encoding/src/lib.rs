//! Color encodings for sighting map cells.
//!
//! Every encoding is a pure function returning an integer RGB triple:
//! - Golden-ratio hue distribution over a sorted species list
//! - Day-of-year rainbow (first half-year only)
//! - Observed/expected ratio rainbow

pub mod conversion;
pub mod ratio;
pub mod species;
pub mod temporal;

pub use conversion::{hls_to_rgb, hsv_to_rgb};
pub use ratio::{floored_expected, observed_expected_ratio, ratio_to_rainbow, ratio_to_rainbow_with_cap, DEFAULT_RATIO_CAP, EXPECTED_FLOOR};
pub use species::{SpeciesColorAssignment, GOLDEN_RATIO_CONJUGATE};
pub use temporal::{day_of_year_hue, day_of_year_to_rgb, LAST_GRADIENT_DAY};
