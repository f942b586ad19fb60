// crates/convert-ssr-config/tests/config_validation.rs
// ============================================================================
// Module: Config Validation Tests
// Description: Tests for convert-ssr.toml parsing and validation.
// Purpose: Ensure defaults validate and invalid inputs fail closed.
// Dependencies: convert-ssr-config, tempfile
// ============================================================================

//! ## Overview
//! Covers defaults, the canonical example, boundary values, and file loading.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::io::Write;

use convert_ssr_config::AuditSinkKind;
use convert_ssr_config::ClientConfig;
use convert_ssr_config::ConfigError;
use convert_ssr_config::ConvertSsrConfig;
use convert_ssr_config::MAX_BOOTSTRAP_TIMEOUT_MS;
use convert_ssr_config::MAX_CONFIG_FILE_SIZE;
use convert_ssr_config::MIN_BOOTSTRAP_TIMEOUT_MS;
use convert_ssr_config::StrategyKind;
use convert_ssr_config::config_toml_example;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Asserts that parsing fails validation with a message containing `needle`.
fn assert_invalid(toml: &str, needle: &str) {
    match ConvertSsrConfig::from_toml_str(toml) {
        Err(ConfigError::Invalid(message)) => {
            assert!(message.contains(needle), "expected '{needle}' in '{message}'");
        }
        other => panic!("expected invalid config, got {other:?}"),
    }
}

// ============================================================================
// SECTION: Defaults and Example
// ============================================================================

/// Verifies empty document uses defaults.
#[test]
fn empty_document_uses_defaults() {
    let config = ConvertSsrConfig::from_toml_str("").expect("defaults");
    assert_eq!(config, ConvertSsrConfig::default());
    assert_eq!(config.server.bind, "127.0.0.1:8080");
    assert_eq!(config.bootstrap.strategy, StrategyKind::Actions);
    assert_eq!(config.bootstrap.timeout_ms, 5_000);
    assert_eq!(config.bootstrap.query_key, "convert");
    assert_eq!(config.bootstrap.mode_key, "mode");
    assert_eq!(config.client.kind(), "http");
    assert_eq!(config.audit.sink, AuditSinkKind::Stderr);
}

/// Verifies canonical example validates.
#[test]
fn canonical_example_validates() {
    let config = ConvertSsrConfig::from_toml_str(&config_toml_example()).expect("example");
    assert_eq!(config.bootstrap.strategy, StrategyKind::Actions);
    assert!(matches!(config.client, ClientConfig::Http(_)));
}

/// Verifies static client fixtures parse as json.
#[test]
fn static_client_fixtures_parse_as_json() {
    let config = ConvertSsrConfig::from_toml_str(
        r#"
[bootstrap]
strategy = "fetch_first"

[client]
type = "static"

[client.fixtures]
"USD,EUR" = { USD = "1.00", EUR = "0.92" }
"#,
    )
    .expect("static config");
    assert_eq!(config.bootstrap.strategy, StrategyKind::FetchFirst);
    let ClientConfig::Static(settings) = config.client else {
        panic!("expected static client");
    };
    assert_eq!(settings.fixtures["USD,EUR"]["EUR"], "0.92");
}

// ============================================================================
// SECTION: Invalid Inputs
// ============================================================================

/// Verifies unknown fields are rejected.
#[test]
fn unknown_fields_are_rejected() {
    let err = ConvertSsrConfig::from_toml_str("[bootstrap]\nstrategi = \"actions\"\n")
        .expect_err("unknown field");
    assert!(matches!(err, ConfigError::Parse(_)));
}

/// Verifies unknown strategy is rejected.
#[test]
fn unknown_strategy_is_rejected() {
    let err = ConvertSsrConfig::from_toml_str("[bootstrap]\nstrategy = \"eager\"\n")
        .expect_err("unknown strategy");
    assert!(matches!(err, ConfigError::Parse(_)));
}

/// Verifies bootstrap timeout bounds are inclusive.
#[test]
fn bootstrap_timeout_bounds_are_inclusive() {
    for ok in [MIN_BOOTSTRAP_TIMEOUT_MS, MAX_BOOTSTRAP_TIMEOUT_MS] {
        ConvertSsrConfig::from_toml_str(&format!("[bootstrap]\ntimeout_ms = {ok}\n"))
            .expect("boundary timeout");
    }
    assert_invalid(
        &format!("[bootstrap]\ntimeout_ms = {}\n", MIN_BOOTSTRAP_TIMEOUT_MS - 1),
        "timeout_ms",
    );
    assert_invalid(
        &format!("[bootstrap]\ntimeout_ms = {}\n", MAX_BOOTSTRAP_TIMEOUT_MS + 1),
        "timeout_ms",
    );
}

/// Verifies query keys must be non empty and distinct.
#[test]
fn query_keys_must_be_non_empty_and_distinct() {
    assert_invalid("[bootstrap]\nquery_key = \"\"\n", "query_key");
    assert_invalid("[bootstrap]\nmode_key = \"convert\"\n", "must differ");
    assert_invalid("[bootstrap]\nquery_key = \"a b\"\n", "query_key");
}

/// Verifies bind must be socket address.
#[test]
fn bind_must_be_socket_address() {
    assert_invalid("[server]\nbind = \"localhost\"\n", "bind");
}

/// Verifies cleartext client requires allow http.
#[test]
fn cleartext_client_requires_allow_http() {
    assert_invalid("[client]\ntype = \"http\"\nbase_url = \"http://127.0.0.1:9000\"\n", "allow_http");
    ConvertSsrConfig::from_toml_str(
        "[client]\ntype = \"http\"\nbase_url = \"http://127.0.0.1:9000\"\nallow_http = true\n",
    )
    .expect("opt-in http");
}

/// Verifies client timeouts are bounded.
#[test]
fn client_timeouts_are_bounded() {
    assert_invalid("[client]\ntype = \"http\"\nconnect_timeout_ms = 0\n", "connect_timeout_ms");
    assert_invalid(
        "[client]\ntype = \"http\"\nconnect_timeout_ms = 2000\nrequest_timeout_ms = 1000\n",
        "request_timeout_ms",
    );
    assert_invalid("[client]\ntype = \"http\"\nmax_response_bytes = 0\n", "max_response_bytes");
}

/// Verifies file audit sink requires path.
#[test]
fn file_audit_sink_requires_path() {
    assert_invalid("[audit]\nsink = \"file\"\n", "audit.path");
    assert_invalid("[audit]\nsink = \"none\"\npath = \"audit.jsonl\"\n", "file sink");
    ConvertSsrConfig::from_toml_str("[audit]\nsink = \"file\"\npath = \"audit.jsonl\"\n")
        .expect("file sink");
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Verifies load reads explicit path.
#[test]
fn load_reads_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(config_toml_example().as_bytes()).expect("write");
    let config = ConvertSsrConfig::load(Some(file.path())).expect("load");
    assert_eq!(config.bootstrap.query_key, "convert");
}

/// Verifies load rejects oversized file.
#[test]
fn load_rejects_oversized_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    let padding = format!("# {}\n", "x".repeat(MAX_CONFIG_FILE_SIZE));
    file.write_all(padding.as_bytes()).expect("write");
    let err = ConvertSsrConfig::load(Some(file.path())).expect_err("oversized");
    assert!(err.to_string().contains("size limit"));
}

/// Verifies load reports missing file as io error.
#[test]
fn load_reports_missing_file_as_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = ConvertSsrConfig::load(Some(&dir.path().join("absent.toml"))).expect_err("missing");
    assert!(matches!(err, ConfigError::Io(_)));
}
