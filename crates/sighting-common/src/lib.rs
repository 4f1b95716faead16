//! Common types and utilities shared across all sighting-map crates.

pub mod cell;
pub mod color;
pub mod error;
pub mod time;

pub use cell::{AggregatedCell, CellKey, DayCell, SightingRecord, WeekCount};
pub use color::{RenderPoint, Rgb};
pub use error::{SightingError, SightingResult};
pub use time::{format_date, format_date_range, parse_timestamp, week_start};
