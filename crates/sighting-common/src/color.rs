//! Color and render-point types consumed by the map renderer.

use serde::{Deserialize, Serialize};

/// Color value in RGB format. Alpha is attached separately when a point is
/// assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// RGBA array in the layout deck.gl expects for `getFillColor`.
    pub fn with_alpha(self, a: u8) -> [u8; 4] {
        [self.r, self.g, self.b, a]
    }

    /// CSS `rgb(r, g, b)` form used for histogram bars.
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Encoding-agnostic point handed to the map renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// RGBA, each channel 0-255.
    pub color: [u8; 4],
    /// Pixels in fixed-size mode, meters in scale-with-map mode. Never 0.
    pub radius: u32,
    pub tooltip: String,
}

impl RenderPoint {
    pub fn new(latitude: f64, longitude: f64, color: [u8; 4], radius: u32, tooltip: String) -> Self {
        Self {
            latitude,
            longitude,
            color,
            radius: radius.max(1),
            tooltip,
        }
    }

    pub fn alpha(&self) -> u8 {
        self.color[3]
    }
}
