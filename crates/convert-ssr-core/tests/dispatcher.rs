// crates/convert-ssr-core/tests/dispatcher.rs
// ============================================================================
// Module: Dispatcher and Request Scope Tests
// Description: Tests for listener routing and request scope teardown.
// Purpose: Validate that completion fires once and listeners never leak.
// Dependencies: convert-ssr-core, tokio
// ============================================================================

//! ## Overview
//! Exercises the listener registry directly and the armed request scope
//! with hand-fired events, including the second-event-after-teardown case.

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
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use convert_ssr_core::BootstrapError;
use convert_ssr_core::ConversionData;
use convert_ssr_core::ConverterView;
use convert_ssr_core::Dispatcher;
use convert_ssr_core::EventPayload;
use convert_ssr_core::FetchError;
use convert_ssr_core::RenderMode;
use convert_ssr_core::RequestScope;
use convert_ssr_core::StoreEvent;
use convert_ssr_core::runtime::Action;
use serde_json::json;

/// Returns a fresh hit counter.
fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

/// Verifies events reach only listeners of the matching kind.
#[test]
fn emit_routes_by_event_kind() {
    let dispatcher = Dispatcher::new();
    let updated = counter();
    let failed = counter();
    let updated_hits = Arc::clone(&updated);
    dispatcher.subscribe(StoreEvent::ConversionsUpdated, move |_| {
        updated_hits.fetch_add(1, Ordering::SeqCst);
    });
    let failed_hits = Arc::clone(&failed);
    dispatcher.subscribe(StoreEvent::ConversionError, move |_| {
        failed_hits.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(dispatcher.emit(&EventPayload::ConversionsUpdated), 1);
    assert_eq!(updated.load(Ordering::SeqCst), 1);
    assert_eq!(failed.load(Ordering::SeqCst), 0);
}

/// Verifies unsubscribe and remove-all stop further deliveries.
#[test]
fn removed_listeners_are_not_invoked() {
    let dispatcher = Dispatcher::new();
    let hits = counter();
    let first_hits = Arc::clone(&hits);
    let first = dispatcher.subscribe(StoreEvent::ConversionsUpdated, move |_| {
        first_hits.fetch_add(1, Ordering::SeqCst);
    });
    let second_hits = Arc::clone(&hits);
    dispatcher.subscribe(StoreEvent::ConversionsUpdated, move |_| {
        second_hits.fetch_add(1, Ordering::SeqCst);
    });

    assert!(dispatcher.unsubscribe(first));
    assert!(!dispatcher.unsubscribe(first));
    assert_eq!(dispatcher.emit(&EventPayload::ConversionsUpdated), 1);
    assert_eq!(dispatcher.remove_all_listeners(), 1);
    assert_eq!(dispatcher.emit(&EventPayload::ConversionsUpdated), 0);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(dispatcher.listener_count(), 0);
}

/// Verifies a listener may clear the registry while an emission is running.
#[test]
fn listener_can_clear_registry_reentrantly() {
    let dispatcher = Arc::new(Dispatcher::new());
    let hits = counter();
    let registry = Arc::clone(&dispatcher);
    let first_hits = Arc::clone(&hits);
    dispatcher.subscribe(StoreEvent::ConversionError, move |_| {
        first_hits.fetch_add(1, Ordering::SeqCst);
        registry.remove_all_listeners();
    });
    let second_hits = Arc::clone(&hits);
    dispatcher.subscribe(StoreEvent::ConversionError, move |_| {
        second_hits.fetch_add(1, Ordering::SeqCst);
    });

    let error = EventPayload::ConversionError(FetchError::Status(500));
    assert_eq!(dispatcher.emit(&error), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(dispatcher.listener_count(), 0);
}

/// Verifies success completes once and a later error event is ignored.
#[tokio::test]
async fn success_then_error_tears_down_once() {
    let scope = RequestScope::new();
    let receiver = scope.arm(Arc::new(ConverterView), RenderMode::Full);
    assert_eq!(scope.dispatcher().listener_count(), 2);
    scope.store().apply(Action::SetTypes("currency".to_string())).unwrap();
    scope
        .store()
        .apply(Action::ReceiveConversions(ConversionData(json!({"EUR": 92}))))
        .unwrap();

    assert_eq!(scope.dispatcher().emit(&EventPayload::ConversionsUpdated), 1);
    assert!(scope.is_torn_down());
    assert_eq!(scope.dispatcher().listener_count(), 0);
    let late = EventPayload::ConversionError(FetchError::Status(500));
    assert_eq!(scope.dispatcher().emit(&late), 0);
    assert!(!scope.teardown(), "teardown must not run twice");

    let locals = receiver.await.expect("outcome sent").expect("success outcome");
    let snapshot = locals.snapshot.expect("snapshot");
    assert!(snapshot.as_str().contains("\"EUR\":92"));
    assert!(locals.markup.expect("markup").contains("data-types=\"currency\""));
    assert!(scope.store().state().unwrap().is_empty(), "store flushed on teardown");
}

/// Verifies error completes once and a later success event is ignored.
#[tokio::test]
async fn error_then_success_tears_down_once() {
    let scope = RequestScope::new();
    let receiver = scope.arm(Arc::new(ConverterView), RenderMode::Full);

    let error = EventPayload::ConversionError(FetchError::Transport("refused".to_string()));
    assert_eq!(scope.dispatcher().emit(&error), 1);
    assert_eq!(scope.dispatcher().emit(&EventPayload::ConversionsUpdated), 0);
    assert!(!scope.teardown());

    let outcome = receiver.await.expect("outcome sent");
    assert_eq!(
        outcome,
        Err(BootstrapError::Action(FetchError::Transport("refused".to_string())))
    );
}

/// Verifies dropping an armed scope releases listeners and closes the channel.
#[tokio::test]
async fn dropped_scope_closes_receiver() {
    let scope = RequestScope::new();
    let dispatcher = Arc::clone(scope.dispatcher());
    let receiver = scope.arm(Arc::new(ConverterView), RenderMode::DataOnly);
    drop(scope);
    assert_eq!(dispatcher.listener_count(), 0);
    assert!(receiver.await.is_err());
}

/// Verifies a scope finished before any event fired reports incomplete.
#[tokio::test]
async fn scope_finished_without_event_is_incomplete() {
    let scope = RequestScope::new();
    let receiver = scope.arm(Arc::new(ConverterView), RenderMode::Full);
    scope.store().apply(Action::SetTypes("currency".to_string())).unwrap();

    let outcome = scope.finish(receiver).await;
    assert_eq!(outcome, Err(BootstrapError::Incomplete));
    assert!(scope.is_torn_down());
    assert_eq!(scope.dispatcher().listener_count(), 0);
    assert_eq!(scope.dispatcher().emit(&EventPayload::ConversionsUpdated), 0);
}

/// Verifies finishing after an event returns that event's outcome.
#[tokio::test]
async fn scope_finished_after_error_keeps_error() {
    let scope = RequestScope::new();
    let receiver = scope.arm(Arc::new(ConverterView), RenderMode::DataOnly);
    let error = EventPayload::ConversionError(FetchError::NotFound("GBP".to_string()));
    assert_eq!(scope.dispatcher().emit(&error), 1);

    let outcome = scope.finish(receiver).await;
    assert_eq!(outcome, Err(BootstrapError::Action(FetchError::NotFound("GBP".to_string()))));
}
