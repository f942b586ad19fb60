// crates/convert-ssr-core/tests/strategies.rs
// ============================================================================
// Module: Bootstrap Strategy Tests
// Description: Tests for the fetch-first and actions bootstrap strategies.
// Purpose: Validate render locals, failure propagation, and request isolation.
// Dependencies: convert-ssr-core, tokio
// ============================================================================

//! ## Overview
//! Runs both strategies against the in-memory conversion client and checks
//! the snapshot/markup contract for every render mode, fetch failures, and
//! isolation between sequential and interleaved requests.

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

use std::sync::Arc;
use std::time::Duration;

use convert_ssr_core::ActionsStrategy;
use convert_ssr_core::BootstrapError;
use convert_ssr_core::BootstrapInstruction;
use convert_ssr_core::BootstrapStrategy;
use convert_ssr_core::CONVERSIONS_SLOT;
use convert_ssr_core::ConversionClient;
use convert_ssr_core::ConversionsState;
use convert_ssr_core::ConverterView;
use convert_ssr_core::FetchError;
use convert_ssr_core::FetchFirstStrategy;
use convert_ssr_core::InMemoryConversionClient;
use convert_ssr_core::RenderError;
use convert_ssr_core::RenderLocals;
use convert_ssr_core::RenderMode;
use convert_ssr_core::View;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

struct FailingView;

impl View for FailingView {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn render_to_string(&self, _state: &ConversionsState) -> Result<String, RenderError> {
        Err(RenderError::Render("component threw".to_string()))
    }
}

fn fixture_client() -> InMemoryConversionClient {
    InMemoryConversionClient::new()
        .with_fixture("currency", json!({"EUR": 0.92, "GBP": 0.79}))
        .with_fixture("length", json!({"ft": 3.28}))
}

fn strategies(client: Arc<dyn ConversionClient>) -> Vec<Box<dyn BootstrapStrategy>> {
    vec![
        Box::new(FetchFirstStrategy::new(Arc::clone(&client), Arc::new(ConverterView))),
        Box::new(ActionsStrategy::new(client, Arc::new(ConverterView))),
    ]
}

fn instruction(types: &str, value: &str) -> BootstrapInstruction {
    BootstrapInstruction {
        types: types.to_string(),
        value: value.to_string(),
    }
}

fn conversions_slot(locals: &RenderLocals) -> Value {
    let snapshot = locals.snapshot.as_ref().expect("snapshot");
    snapshot.slots().expect("snapshot json")[CONVERSIONS_SLOT].clone()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies full mode yields both snapshot and markup.
#[tokio::test]
async fn full_mode_produces_snapshot_and_markup() {
    for strategy in strategies(Arc::new(fixture_client())) {
        let locals = strategy
            .bootstrap(&instruction("currency", "100"), RenderMode::Full)
            .await
            .expect("bootstrap");
        let slot = conversions_slot(&locals);
        assert_eq!(slot["types"], "currency", "{}", strategy.name());
        assert_eq!(slot["value"], "100", "{}", strategy.name());
        assert_eq!(slot["conversions"], json!({"EUR": 0.92, "GBP": 0.79}));
        let markup = locals.markup.expect("markup");
        assert!(markup.contains("data-value=\"100\""), "{}: {markup}", strategy.name());
        assert!(markup.contains("<li data-type=\"EUR\">0.92</li>"));
    }
}

/// Verifies data-only mode yields a snapshot without markup.
#[tokio::test]
async fn data_only_mode_skips_markup() {
    for strategy in strategies(Arc::new(fixture_client())) {
        let locals = strategy
            .bootstrap(&instruction("currency", "100"), RenderMode::DataOnly)
            .await
            .expect("bootstrap");
        assert!(locals.snapshot.is_some(), "{}", strategy.name());
        assert!(locals.markup.is_none(), "{}", strategy.name());
    }
}

/// Verifies disabled mode bypasses the client entirely.
#[tokio::test]
async fn disabled_mode_bypasses_fetch() {
    let client = Arc::new(fixture_client());
    for strategy in strategies(Arc::clone(&client) as Arc<dyn ConversionClient>) {
        let locals = strategy
            .bootstrap(&instruction("currency", "100"), RenderMode::Disabled)
            .await
            .expect("bootstrap");
        assert_eq!(locals, RenderLocals::default());
    }
    assert_eq!(client.call_count(), 0);
}

/// Verifies fetch failures surface unchanged and produce no locals.
#[tokio::test]
async fn fetch_failure_is_propagated() {
    let failure = FetchError::Status(503);
    let client = Arc::new(fixture_client().with_failure(failure.clone()));
    let fetch_first = FetchFirstStrategy::new(client.clone(), Arc::new(ConverterView));
    let err = fetch_first
        .bootstrap(&instruction("currency", "100"), RenderMode::Full)
        .await
        .expect_err("fetch failure");
    assert_eq!(err, BootstrapError::Fetch(failure.clone()));

    let actions = ActionsStrategy::new(client.clone(), Arc::new(ConverterView));
    let err = actions
        .bootstrap(&instruction("currency", "100"), RenderMode::Full)
        .await
        .expect_err("action failure");
    assert_eq!(err, BootstrapError::Action(failure));
    assert_eq!(client.call_count(), 2);
}

/// Verifies unknown types fail with a not-found fetch error.
#[tokio::test]
async fn unknown_types_fail() {
    for strategy in strategies(Arc::new(fixture_client())) {
        let err = strategy
            .bootstrap(&instruction("volume", "1"), RenderMode::Full)
            .await
            .expect_err("unknown types");
        assert!(err.to_string().contains("volume"), "{}: {err}", strategy.name());
    }
}

/// Verifies render failures abort the bootstrap.
#[tokio::test]
async fn render_failure_is_propagated() {
    let client: Arc<dyn ConversionClient> = Arc::new(fixture_client());
    let strategies: Vec<Box<dyn BootstrapStrategy>> = vec![
        Box::new(FetchFirstStrategy::new(Arc::clone(&client), Arc::new(FailingView))),
        Box::new(ActionsStrategy::new(client, Arc::new(FailingView))),
    ];
    for strategy in strategies {
        let err = strategy
            .bootstrap(&instruction("currency", "1"), RenderMode::Full)
            .await
            .expect_err("render failure");
        assert_eq!(err.kind(), "render_failed", "{}", strategy.name());
        let locals = strategy
            .bootstrap(&instruction("currency", "1"), RenderMode::DataOnly)
            .await
            .expect("data-only never renders");
        assert!(locals.markup.is_none());
    }
}

/// Verifies sequential requests each see only their own data.
#[tokio::test]
async fn sequential_requests_are_isolated() {
    for strategy in strategies(Arc::new(fixture_client())) {
        let first = strategy
            .bootstrap(&instruction("currency", "100"), RenderMode::Full)
            .await
            .expect("first");
        let second = strategy
            .bootstrap(&instruction("length", "7"), RenderMode::Full)
            .await
            .expect("second");
        let again = strategy
            .bootstrap(&instruction("currency", "100"), RenderMode::Full)
            .await
            .expect("again");
        assert_eq!(conversions_slot(&second)["types"], "length");
        assert_eq!(conversions_slot(&second)["conversions"], json!({"ft": 3.28}));
        assert_eq!(first, again, "{}", strategy.name());
    }
}

/// Verifies interleaved requests cannot observe each other's store.
#[tokio::test]
async fn interleaved_requests_are_isolated() {
    let client: Arc<dyn ConversionClient> =
        Arc::new(fixture_client().with_delay(Duration::from_millis(20)));
    for strategy in strategies(client) {
        let currency = instruction("currency", "100");
        let length = instruction("length", "7");
        let (first, second) = tokio::join!(
            strategy.bootstrap(&currency, RenderMode::Full),
            strategy.bootstrap(&length, RenderMode::Full),
        );
        let first = first.expect("first");
        let second = second.expect("second");
        assert_eq!(conversions_slot(&first)["types"], "currency", "{}", strategy.name());
        assert_eq!(conversions_slot(&second)["types"], "length", "{}", strategy.name());
        assert!(first.markup.expect("markup").contains("EUR"));
        assert!(second.markup.expect("markup").contains("ft"));
    }
}
