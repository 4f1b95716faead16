//! Weekly record histograms.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use sighting_common::{week_start, Rgb, WeekCount};

/// One histogram bar, normalized against the tallest bar of its result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBar {
    /// Monday of the week, `YYYY-MM-DD`.
    pub week: String,
    /// Short axis label, e.g. `Jan 06`.
    pub label: String,
    pub count: u64,
    pub height_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Bars for `weeks` without per-bar color.
pub fn build_histogram(weeks: &[WeekCount]) -> Vec<HistogramBar> {
    build_histogram_with(weeks, |_| None)
}

/// Bars for `weeks` with a color chosen from each week's Monday.
pub fn build_histogram_with<F>(weeks: &[WeekCount], color: F) -> Vec<HistogramBar>
where
    F: Fn(NaiveDate) -> Option<Rgb>,
{
    let max_count = weeks.iter().map(|w| w.count).max().unwrap_or(1).max(1);

    weeks
        .iter()
        .map(|w| HistogramBar {
            week: w.week.format("%Y-%m-%d").to_string(),
            label: w.week.format("%b %d").to_string(),
            count: w.count,
            height_pct: 100.0 * w.count as f64 / max_count as f64,
            color: color(w.week).map(Rgb::to_css),
        })
        .collect()
}

/// Count raw dates into Monday-keyed weeks, ascending.
pub fn bucket_by_week<I>(dates: I) -> Vec<WeekCount>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut buckets: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for date in dates {
        *buckets.entry(week_start(date)).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|(week, count)| WeekCount { week, count })
        .collect()
}
