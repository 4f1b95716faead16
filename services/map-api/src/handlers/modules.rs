//! Module listing and rendering.

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};

use map_core::{ModuleDescriptor, ModuleView, RequestParams};
use sighting_common::SightingError;

use crate::handlers::common::ApiError;
use crate::metrics::{record_module_render, record_unknown_module};
use crate::state::AppState;

/// GET /api/modules - Registered module descriptors
pub async fn list_modules_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<Vec<ModuleDescriptor>> {
    Json(state.registry.descriptors().to_vec())
}

/// GET /api/modules/:name - Render one module as JSON
pub async fn module_view_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(name): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ModuleView>, ApiError> {
    let params = RequestParams::new(pairs);
    Ok(Json(render_module(&state, &name, &params).await?))
}

/// Look up and render `name`, logging and recording the outcome.
#[instrument(skip(state, params))]
pub async fn render_module(
    state: &AppState,
    name: &str,
    params: &RequestParams,
) -> Result<ModuleView, SightingError> {
    let Some(descriptor) = state.registry.get(name) else {
        record_unknown_module();
        return Err(SightingError::ModuleNotFound(name.to_string()));
    };

    let start = Instant::now();
    let ctx = state.context(&descriptor.name, params);
    let result = descriptor.render(&ctx).await;
    record_module_render(&descriptor.name, start.elapsed(), result.is_ok());

    match &result {
        Ok(view) => info!(
            module = %descriptor.name,
            cells = view.cell_count,
            records = view.result_count,
            empty = view.is_empty_state(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Rendered module"
        ),
        Err(e) => error!(module = %descriptor.name, error = %e, "Module render failed"),
    }

    result
}
