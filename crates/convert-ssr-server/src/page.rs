// crates/convert-ssr-server/src/page.rs
// ============================================================================
// Module: Page Template
// Description: Downstream HTML handler consuming bootstrap render locals.
// Purpose: Embed pre-rendered markup and the store snapshot into the page.
// Dependencies: axum, convert-ssr-core
// ============================================================================

//! ## Overview
//! The page handler is the template stage that runs after the bootstrap
//! middleware. Markup goes inside `<div id="app">`; the snapshot goes into a
//! JSON script element so the client can rehydrate its store. Requests without
//! locals get an empty shell.

use axum::extract::Request;
use axum::response::Html;
use convert_ssr_core::RenderLocals;

/// Element id of the embedded snapshot script.
pub const SNAPSHOT_ELEMENT_ID: &str = "__SNAPSHOT__";

/// Renders the page using any render locals left by the middleware.
pub async fn render_page(request: Request) -> Html<String> {
    Html(page_html(request.extensions().get::<RenderLocals>()))
}

/// Liveness probe.
pub async fn healthz() -> &'static str {
    "ok"
}

/// Builds the page document for the given locals.
#[must_use]
pub fn page_html(locals: Option<&RenderLocals>) -> String {
    let markup = locals.and_then(|locals| locals.markup.as_deref()).unwrap_or_default();
    let snapshot = locals
        .and_then(|locals| locals.snapshot.as_ref())
        .map(|snapshot| {
            format!(
                "<script type=\"application/json\" id=\"{SNAPSHOT_ELEMENT_ID}\">{}</script>",
                escape_script_json(snapshot.as_str())
            )
        })
        .unwrap_or_default();
    format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>Converter</title></head>\n\
         <body>\n<div id=\"app\">{markup}</div>\n{snapshot}\n</body>\n</html>\n"
    )
}

/// Escapes JSON so it cannot close the surrounding script element.
fn escape_script_json(json: &str) -> String {
    json.replace('<', "\\u003c")
}
