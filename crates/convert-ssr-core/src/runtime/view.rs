// crates/convert-ssr-core/src/runtime/view.rs
// ============================================================================
// Module: Converter View
// Description: Built-in view rendering conversion state to HTML markup.
// Purpose: Provide a default render target for the bootstrap strategies.
// Dependencies: crate::core, crate::interfaces, serde_json
// ============================================================================

//! ## Overview
//! [`ConverterView`] renders the conversions slot as a small HTML fragment.
//! All store-derived text is escaped before it reaches the markup.

use std::fmt::Write;

use serde_json::Value;

use crate::core::ConversionsState;
use crate::interfaces::RenderError;
use crate::interfaces::View;

/// Root element class for rendered converter markup.
const ROOT_CLASS: &str = "converter";

/// Default converter view.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConverterView;

impl View for ConverterView {
    fn name(&self) -> &'static str {
        "converter"
    }

    fn render_to_string(&self, state: &ConversionsState) -> Result<String, RenderError> {
        let mut out = String::new();
        write!(
            out,
            "<section class=\"{ROOT_CLASS}\" data-types=\"{}\" data-value=\"{}\">",
            escape_html(&state.types),
            escape_html(&state.value)
        )
        .map_err(|err| RenderError::Render(err.to_string()))?;
        if let Some(error) = &state.error {
            write!(out, "<p class=\"error\">{}</p>", escape_html(error))
                .map_err(|err| RenderError::Render(err.to_string()))?;
        }
        match state.conversions.as_ref().map(|data| data.as_value()) {
            Some(Value::Object(entries)) => {
                out.push_str("<ul>");
                for (name, amount) in entries {
                    write!(
                        out,
                        "<li data-type=\"{}\">{}</li>",
                        escape_html(name),
                        escape_html(&display_value(amount))
                    )
                    .map_err(|err| RenderError::Render(err.to_string()))?;
                }
                out.push_str("</ul>");
            }
            Some(other) => {
                write!(out, "<pre>{}</pre>", escape_html(&display_value(other)))
                    .map_err(|err| RenderError::Render(err.to_string()))?;
            }
            None => out.push_str("<p class=\"empty\"></p>"),
        }
        out.push_str("</section>");
        Ok(out)
    }
}

/// Formats a JSON value for display, without quotes around strings.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Escapes text for HTML element and attribute content.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}
