//! Map document rendering.
//!
//! Points are embedded as JSON in a standalone deck.gl page. The page is
//! self-contained so the shell can place it in an iframe `srcdoc`.

use serde::{Deserialize, Serialize};

use sighting_common::{RenderPoint, SightingError, SightingResult};

use crate::controls::MapControls;
use crate::spread::{SpreadSeries, SpreadSettings};

/// Forced dark page background, injected at the start of `<head>`.
pub const DARK_BACKGROUND_STYLE: &str =
    "<style>html, body { background: #121212 !important; }</style>";

const DECK_SCRIPT: &str = "https://unpkg.com/deck.gl@8.9.35/dist.min.js";
const MAPLIBRE_SCRIPT: &str = "https://unpkg.com/maplibre-gl@3.6.2/dist/maplibre-gl.js";
const MAPLIBRE_CSS: &str = "https://unpkg.com/maplibre-gl@3.6.2/dist/maplibre-gl.css";
const BASEMAP_STYLE: &str = "https://basemaps.cartocdn.com/gl/dark-matter-gl-style/style.json";

/// Initial camera position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            latitude: 65.062,
            longitude: 26.719,
            zoom: 5.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapRenderer {
    viewport: Viewport,
}

#[derive(Serialize)]
struct PointData<'a> {
    position: [f64; 2],
    color: [u8; 4],
    radius: u32,
    tooltip: &'a str,
}

impl MapRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Scatterplot document for `points`.
    ///
    /// In fixed-size mode every point is exactly `point_size` pixels; in
    /// scale-with-map mode radii are meters and points never shrink below
    /// one pixel.
    pub fn render_points(&self, points: &[RenderPoint], controls: &MapControls) -> SightingResult<String> {
        let data: Vec<PointData<'_>> = points
            .iter()
            .map(|p| PointData {
                position: [p.longitude, p.latitude],
                color: p.color,
                radius: p.radius,
                tooltip: &p.tooltip,
            })
            .collect();

        let sizing = if controls.scale_with_map {
            "radiusUnits: 'meters',\n        radiusMinPixels: 1,".to_string()
        } else {
            format!(
                "radiusUnits: 'pixels',\n        radiusMinPixels: {size},\n        radiusMaxPixels: {size},",
                size = controls.point_size
            )
        };

        let script = format!(
            r#"const DATA = {data};
    const layer = new deck.ScatterplotLayer({{
        id: 'cells',
        data: DATA,
        pickable: true,
        stroked: false,
        filled: true,
        {sizing}
        getPosition: d => d.position,
        getRadius: d => d.radius,
        getFillColor: d => d.color,
    }});
    new deck.DeckGL({{
        container: 'map',
        mapStyle: '{basemap}',
        initialViewState: {view},
        controller: true,
        layers: [layer],
        getTooltip: ({{object}}) => object && {{text: object.tooltip}},
    }});"#,
            data = script_json(&data)?,
            sizing = sizing,
            basemap = BASEMAP_STYLE,
            view = self.view_state()?,
        );

        Ok(self.document(&script))
    }

    /// Animated spread document. Points appear on their day and fade out
    /// over `fade_days`; playback loops over the series' day range.
    pub fn render_spread(
        &self,
        series: &SpreadSeries,
        controls: &MapControls,
        settings: &SpreadSettings,
        color: [u8; 3],
    ) -> SightingResult<String> {
        let (first_day, last_day) = series.day_range().unwrap_or((1, 1));
        let radius = controls.radius();
        let (units, min_pixels) = if controls.scale_with_map {
            ("meters", 1)
        } else {
            ("pixels", controls.point_size)
        };

        let script = format!(
            r#"const POINTS = {points};
    const FADE_DAYS = {fade};
    const SPEED = {speed};
    const FIRST_DAY = {first};
    const LAST_DAY = {last};
    const COLOR = {color};
    const dayLabel = document.getElementById('day');
    const deckgl = new deck.DeckGL({{
        container: 'map',
        mapStyle: '{basemap}',
        initialViewState: {view},
        controller: true,
        layers: [],
    }});
    let day = FIRST_DAY;
    let last = performance.now();
    function frame(now) {{
        day += (now - last) / 1000 * SPEED;
        last = now;
        if (day > LAST_DAY + FADE_DAYS) day = FIRST_DAY;
        const visible = POINTS.filter(p => p[2] <= day && day - p[2] < FADE_DAYS);
        deckgl.setProps({{layers: [new deck.ScatterplotLayer({{
            id: 'spread',
            data: visible,
            radiusUnits: '{units}',
            radiusMinPixels: {min_pixels},
            getPosition: p => [p[1], p[0]],
            getRadius: {radius},
            getFillColor: p => [...COLOR, Math.round(255 * (1 - (day - p[2]) / FADE_DAYS))],
            updateTriggers: {{getFillColor: day}},
        }})]}});
        dayLabel.textContent = 'Day ' + Math.floor(day);
        requestAnimationFrame(frame);
    }}
    requestAnimationFrame(frame);"#,
            points = script_json(&series.points)?,
            fade = settings.fade_days,
            speed = settings.speed,
            first = first_day,
            last = last_day,
            color = script_json(&color)?,
            basemap = BASEMAP_STYLE,
            view = self.view_state()?,
            units = units,
            min_pixels = min_pixels,
            radius = radius,
        );

        Ok(self.document(&script))
    }

    fn view_state(&self) -> SightingResult<String> {
        script_json(&serde_json::json!({
            "latitude": self.viewport.latitude,
            "longitude": self.viewport.longitude,
            "zoom": self.viewport.zoom,
            "pitch": 0,
            "bearing": 0,
        }))
    }

    fn document(&self, script: &str) -> String {
        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<script src="{deck}"></script>
<script src="{maplibre}"></script>
<link href="{maplibre_css}" rel="stylesheet">
<style>
    body {{ margin: 0; padding: 0; }}
    #map {{ position: absolute; top: 0; bottom: 0; width: 100%; }}
    #day {{ position: absolute; top: 8px; left: 8px; color: #eee; font-family: sans-serif; z-index: 1; }}
</style>
</head>
<body>
<div id="day"></div>
<div id="map"></div>
<script>
    {script}
</script>
</body>
</html>
"#,
            deck = DECK_SCRIPT,
            maplibre = MAPLIBRE_SCRIPT,
            maplibre_css = MAPLIBRE_CSS,
            script = script,
        );
        inject_dark_background(&html)
    }
}

/// Insert [`DARK_BACKGROUND_STYLE`] right after the first `<head>` tag.
pub fn inject_dark_background(html: &str) -> String {
    match html.find("<head>") {
        Some(idx) => {
            let at = idx + "<head>".len();
            let mut out = String::with_capacity(html.len() + DARK_BACKGROUND_STYLE.len());
            out.push_str(&html[..at]);
            out.push_str(DARK_BACKGROUND_STYLE);
            out.push_str(&html[at..]);
            out
        }
        None => html.to_string(),
    }
}

/// JSON safe to place inside a `<script>` element.
fn script_json<T: Serialize + ?Sized>(value: &T) -> SightingResult<String> {
    serde_json::to_string(value)
        .map(|json| json.replace("</", "<\\/"))
        .map_err(|e| SightingError::RenderError(format!("Failed to encode map data: {}", e)))
}
