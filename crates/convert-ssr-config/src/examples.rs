// crates/convert-ssr-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and the CLI.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for `convert-ssr.toml`. The output is deterministic and
//! must always pass validation.

/// Returns a canonical example `convert-ssr.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[server]
bind = "127.0.0.1:8080"

[bootstrap]
# "actions" fires store actions and waits for completion events;
# "fetch_first" fetches conversion data before touching a store.
strategy = "actions"
timeout_ms = 5000
query_key = "convert"
mode_key = "mode"

[client]
type = "http"
base_url = "https://rates.example.com"
path = "/conversions"
connect_timeout_ms = 500
request_timeout_ms = 5000
max_response_bytes = 1048576
allow_http = false
user_agent = "convert-ssr/0.1"

# Offline alternative:
# [client]
# type = "static"
# [client.fixtures]
# "USD,EUR" = { USD = "1.00", EUR = "0.92" }

[audit]
sink = "stderr"
# sink = "file"
# path = "convert-ssr-audit.jsonl"
"#,
    )
}
