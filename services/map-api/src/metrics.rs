//! Service metrics.

use metrics::{counter, histogram};
use std::time::Duration;

/// Record one module render.
pub fn record_module_render(module: &str, elapsed: Duration, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    counter!("map_module_renders_total", "module" => module.to_string(), "status" => status)
        .increment(1);
    histogram!("map_module_render_duration_ms", "module" => module.to_string())
        .record(elapsed.as_secs_f64() * 1000.0);
}

pub fn record_unknown_module() {
    counter!("map_unknown_module_requests_total").increment(1);
}
