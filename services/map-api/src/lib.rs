//! Sighting map HTTP service.
//!
//! A thin shell over `map-core`: it builds the module registry and shared
//! state at startup and routes each request to one registered module.

pub mod app;
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod state;

pub use app::router;
pub use config::MapConfig;
pub use state::AppState;
