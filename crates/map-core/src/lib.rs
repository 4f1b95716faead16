//! Map pipeline shared by every visualization module.
//!
//! - `assembler`: aggregated cells → render points
//! - `histogram`: weekly record histograms
//! - `spread`: day-ordered point streams for animation
//! - `controls`: parsing of shared display parameters
//! - `context`: per-request capabilities handed to modules
//! - `registry`: the module trait and the startup registry
//! - `html`: map document rendering
//! - `modules`: built-in visualizations

pub mod assembler;
pub mod context;
pub mod controls;
pub mod histogram;
pub mod html;
pub mod modules;
pub mod params;
pub mod registry;
pub mod species;
pub mod spread;
pub mod view;

pub use assembler::{count_scaled_alpha, AlphaPolicy, CellAssembler, CellColor, TooltipStyle};
pub use context::ModuleContext;
pub use controls::{MapControls, DEFAULT_OPACITY, DEFAULT_POINT_SIZE, WORLD_RADIUS_METERS};
pub use histogram::{build_histogram, bucket_by_week, HistogramBar};
pub use html::{MapRenderer, Viewport, DARK_BACKGROUND_STYLE};
pub use modules::builtin_registry;
pub use params::RequestParams;
pub use registry::{MapModule, ModuleDescriptor, ModuleRegistry, ModuleRegistryBuilder};
pub use species::SpeciesList;
pub use spread::{spread_points, SpreadPoint, SpreadSeries, SpreadSettings};
pub use view::ModuleView;
