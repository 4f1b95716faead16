//! Day-ordered point streams for the spread animation.

use serde::Serialize;

use sighting_common::DayCell;

use crate::controls::parse_clamped_int;
use crate::params::RequestParams;

pub const DEFAULT_FADE_DAYS: u32 = 14;
pub const MIN_FADE_DAYS: u32 = 1;
pub const MAX_FADE_DAYS: u32 = 60;

pub const DEFAULT_SPEED: u32 = 20;
pub const MIN_SPEED: u32 = 5;
pub const MAX_SPEED: u32 = 100;

/// `[latitude, longitude, day_of_year]`, serialized as a JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpreadPoint(pub f64, pub f64, pub u32);

impl SpreadPoint {
    pub fn day(&self) -> u32 {
        self.2
    }
}

/// Playback settings, passed through to the client unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpreadSettings {
    /// Days a point stays visible after it appears.
    pub fade_days: u32,
    /// Playback rate in days per second.
    pub speed: u32,
}

impl Default for SpreadSettings {
    fn default() -> Self {
        Self {
            fade_days: DEFAULT_FADE_DAYS,
            speed: DEFAULT_SPEED,
        }
    }
}

impl SpreadSettings {
    pub fn from_params(params: &RequestParams) -> Self {
        Self {
            fade_days: parse_clamped_int(
                params.get("fade_days"),
                DEFAULT_FADE_DAYS,
                MIN_FADE_DAYS,
                MAX_FADE_DAYS,
            ),
            speed: parse_clamped_int(params.get("speed"), DEFAULT_SPEED, MIN_SPEED, MAX_SPEED),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpreadSeries {
    pub points: Vec<SpreadPoint>,
    /// Sum of record counts over every (cell, day).
    pub total_records: u64,
}

impl SpreadSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last day with a point.
    pub fn day_range(&self) -> Option<(u32, u32)> {
        Some((self.points.first()?.day(), self.points.last()?.day()))
    }
}

/// One point per (cell, day), ordered by day then latitude then longitude.
pub fn spread_points(mut cells: Vec<DayCell>) -> SpreadSeries {
    cells.sort_by(|a, b| {
        a.day_of_year
            .cmp(&b.day_of_year)
            .then_with(|| a.latitude.total_cmp(&b.latitude))
            .then_with(|| a.longitude.total_cmp(&b.longitude))
    });

    SpreadSeries {
        total_records: cells.iter().map(|c| c.count).sum(),
        points: cells
            .into_iter()
            .map(|c| SpreadPoint(c.latitude, c.longitude, c.day_of_year))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_cell(lat: f64, lon: f64, day: u32, count: u64) -> DayCell {
        DayCell {
            latitude: lat,
            longitude: lon,
            day_of_year: day,
            count,
        }
    }

    #[test]
    fn test_points_ordered_by_day() {
        let series = spread_points(vec![
            day_cell(61.0, 25.0, 40, 1),
            day_cell(62.0, 24.0, 3, 2),
            day_cell(60.0, 27.0, 40, 4),
            day_cell(60.0, 26.0, 40, 1),
        ]);

        assert_eq!(
            series.points,
            vec![
                SpreadPoint(62.0, 24.0, 3),
                SpreadPoint(60.0, 26.0, 40),
                SpreadPoint(60.0, 27.0, 40),
                SpreadPoint(61.0, 25.0, 40),
            ]
        );
        assert_eq!(series.total_records, 8);
        assert_eq!(series.day_range(), Some((3, 40)));
    }

    #[test]
    fn test_point_serializes_as_triple() {
        let json = serde_json::to_string(&SpreadPoint(65.0, 26.5, 12)).unwrap();
        assert_eq!(json, "[65.0,26.5,12]");
    }

    #[test]
    fn test_settings_clamped() {
        let params: RequestParams = [("fade_days", "0"), ("speed", "500")].into_iter().collect();
        let settings = SpreadSettings::from_params(&params);
        assert_eq!(settings.fade_days, 1);
        assert_eq!(settings.speed, 100);
    }

    #[test]
    fn test_settings_defaults() {
        let params: RequestParams = [("fade_days", "soon")].into_iter().collect();
        assert_eq!(SpreadSettings::from_params(&params), SpreadSettings::default());
    }
}
