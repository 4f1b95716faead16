//! HTML pages wrapping module output.

use axum::{
    extract::{Extension, Path, Query},
    response::Html,
};
use std::fmt::Write;
use std::sync::Arc;

use map_core::{HistogramBar, ModuleDescriptor, ModuleView, RequestParams};

use crate::handlers::common::{escape_html, ApiError};
use crate::handlers::modules::render_module;
use crate::state::AppState;

const PAGE_STYLE: &str = r#"<style>
    body { background: #121212; color: #ddd; font-family: sans-serif; margin: 0; padding: 1rem; }
    a { color: #26c2ff; }
    form { display: flex; flex-wrap: wrap; gap: 1rem; align-items: end; margin-bottom: 1rem; }
    iframe { width: 100%; height: 70vh; border: 0; }
    .histogram { display: flex; align-items: end; height: 120px; gap: 2px; margin-top: 1rem; }
    .bar { flex: 1; background: #26c2ff; min-height: 1px; }
    .empty { padding: 2rem; border: 1px dashed #555; }
</style>"#;

/// GET / - Module index
pub async fn index_handler(Extension(state): Extension<Arc<AppState>>) -> Html<String> {
    Html(render_index(state.registry.descriptors()))
}

/// GET /modules/:name - Module page with the map embedded
pub async fn module_page_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(name): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Html<String>, ApiError> {
    let params = RequestParams::new(pairs);
    let view = render_module(&state, &name, &params).await?;
    Ok(Html(render_page(&view, state.registry.descriptors())))
}

pub fn render_index(modules: &[ModuleDescriptor]) -> String {
    let mut items = String::new();
    for m in modules {
        let _ = write!(
            items,
            r#"<li><a href="/modules/{name}">{title}</a> <span>{description}</span></li>"#,
            name = escape_html(&m.name),
            title = escape_html(&m.title),
            description = escape_html(&m.description),
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Sighting Maps</title>{style}</head>
<body>
<h1>Sighting Maps</h1>
<ul>{items}</ul>
</body>
</html>
"#,
        style = PAGE_STYLE,
        items = items,
    )
}

pub fn render_page(view: &ModuleView, modules: &[ModuleDescriptor]) -> String {
    let nav = modules
        .iter()
        .map(|m| {
            format!(
                r#"<a href="/modules/{}">{}</a>"#,
                escape_html(&m.name),
                escape_html(&m.title)
            )
        })
        .collect::<Vec<_>>()
        .join(" | ");

    let body = match (&view.map_html, &view.empty_message) {
        (Some(map), _) => format!(
            "{form}\n<p>{records} records in {cells} cells</p>\n<iframe srcdoc=\"{map}\"></iframe>\n{histogram}",
            form = render_form(view),
            records = view.result_count,
            cells = view.cell_count,
            map = escape_html(map),
            histogram = render_histogram(&view.histogram),
        ),
        (None, Some(message)) => format!(r#"<div class="empty">{}</div>"#, escape_html(message)),
        (None, None) => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title>{style}</head>
<body>
<nav>{nav}</nav>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape_html(&view.title),
        style = PAGE_STYLE,
        nav = nav,
        body = body,
    )
}

fn render_form(view: &ModuleView) -> String {
    let multi = view.extras.contains_key("color_mode");
    let mut options = String::new();
    for species in &view.all_species {
        let selected = if view.selected.contains(species) { " selected" } else { "" };
        let count = view.species_counts.get(species).copied().unwrap_or(0);
        let _ = write!(
            options,
            r#"<option value="{v}"{selected}>{v} ({count})</option>"#,
            v = escape_html(species),
            selected = selected,
            count = count,
        );
    }

    let mut fields = format!(
        r#"<label>Species <select name="species"{multiple}>{options}</select></label>"#,
        multiple = if multi { " multiple" } else { "" },
        options = options,
    );

    if let Some(mode) = view.extras.get("color_mode").and_then(|v| v.as_str()) {
        let _ = write!(
            fields,
            r#"<label>Color <select name="color_mode"><option value="single"{s}>Single</option><option value="species"{p}>By species</option></select></label>"#,
            s = if mode == "single" { " selected" } else { "" },
            p = if mode == "species" { " selected" } else { "" },
        );
    }
    if let Some(opacity) = view.extras.get("opacity").and_then(|v| v.as_f64()) {
        let _ = write!(
            fields,
            r#"<label>Opacity <input type="number" name="opacity" min="0" max="1" step="0.05" value="{}"></label>"#,
            opacity
        );
    }
    if let (Some(fade), Some(speed)) = (view.extras.get("fade_days"), view.extras.get("speed")) {
        let _ = write!(
            fields,
            r#"<label>Fade days <input type="number" name="fade_days" min="1" max="60" value="{}"></label><label>Speed <input type="number" name="speed" min="5" max="100" value="{}"></label>"#,
            fade, speed
        );
    }

    let _ = write!(
        fields,
        r#"<label>Point size <input type="number" name="point_size" min="2" max="20" value="{size}"></label><label><input type="checkbox" name="scale_with_map"{checked}> Scale with map</label><button type="submit">Update</button>"#,
        size = view.controls.point_size,
        checked = if view.controls.scale_with_map { " checked" } else { "" },
    );

    format!(r#"<form method="get">{}</form>"#, fields)
}

fn render_histogram(bars: &[HistogramBar]) -> String {
    if bars.is_empty() {
        return String::new();
    }
    let mut out = String::from(r#"<div class="histogram">"#);
    for bar in bars {
        let color = bar
            .color
            .as_deref()
            .map(|c| format!(" background: {};", c))
            .unwrap_or_default();
        let _ = write!(
            out,
            r#"<div class="bar" style="height: {h:.1}%;{color}" title="{label}: {count}"></div>"#,
            h = bar.height_pct,
            color = color,
            label = escape_html(&bar.label),
            count = bar.count,
        );
    }
    out.push_str("</div>");
    out
}
