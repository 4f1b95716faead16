//! Shared display parameters.
//!
//! Malformed values fall back to their default and out-of-range values are
//! clamped; neither is ever reported back to the caller.

use serde::Serialize;

use crate::params::RequestParams;

pub const DEFAULT_POINT_SIZE: u32 = 6;
pub const MIN_POINT_SIZE: u32 = 2;
pub const MAX_POINT_SIZE: u32 = 20;

pub const DEFAULT_OPACITY: f64 = 0.5;

/// World radius used when points scale with the map zoom.
pub const WORLD_RADIUS_METERS: u32 = 500;

/// Point size and scaling mode for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapControls {
    pub point_size: u32,
    pub scale_with_map: bool,
}

impl Default for MapControls {
    fn default() -> Self {
        Self {
            point_size: DEFAULT_POINT_SIZE,
            scale_with_map: false,
        }
    }
}

impl MapControls {
    pub fn from_params(params: &RequestParams) -> Self {
        Self {
            point_size: parse_point_size(params.get("point_size")),
            scale_with_map: parse_flag(params.get("scale_with_map")),
        }
    }

    /// Radius for every point: meters when scaling with the map, pixels otherwise.
    pub fn radius(&self) -> u32 {
        if self.scale_with_map {
            WORLD_RADIUS_METERS
        } else {
            self.point_size
        }
    }
}

/// Point size in pixels, clamped to [2, 20], default 6.
pub fn parse_point_size(raw: Option<&str>) -> u32 {
    parse_clamped_int(raw, DEFAULT_POINT_SIZE, MIN_POINT_SIZE, MAX_POINT_SIZE)
}

/// Opacity multiplier, clamped to [0, 1], default 0.5.
pub fn parse_opacity(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
        .unwrap_or(DEFAULT_OPACITY)
}

/// Checkbox-style flag: `on` (as sent by HTML forms), `true` or `1`.
pub fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|s| s.trim().to_ascii_lowercase()).as_deref(),
        Some("on") | Some("true") | Some("1")
    )
}

/// Integer parameter with a default for malformed input and clamping for
/// out-of-range input.
pub fn parse_clamped_int(raw: Option<&str>, default: u32, min: u32, max: u32) -> u32 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(v) => v.clamp(min as i64, max as i64) as u32,
        None => default,
    }
}
