// crates/convert-ssr-core/src/lib.rs
// ============================================================================
// Module: Convert SSR Core Library
// Description: Public API surface for the server-side bootstrap core.
// Purpose: Expose core types, interfaces, and runtime strategies.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Convert SSR core turns a `<types>:<value>` bootstrap instruction into a
//! populated store snapshot and pre-rendered markup for one request. It knows
//! nothing about HTTP: the server crate adapts it into middleware. Two
//! strategies are provided, fetch-first and actions, and both build a fresh
//! store per request.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::BootstrapError;
pub use interfaces::BootstrapStrategy;
pub use interfaces::ConversionClient;
pub use interfaces::FetchError;
pub use interfaces::RenderError;
pub use interfaces::Store;
pub use interfaces::StoreError;
pub use interfaces::View;
pub use runtime::ActionsStrategy;
pub use runtime::ConversionActions;
pub use runtime::ConversionStore;
pub use runtime::ConverterView;
pub use runtime::Dispatcher;
pub use runtime::EventPayload;
pub use runtime::FetchFirstStrategy;
pub use runtime::InMemoryConversionClient;
pub use runtime::RequestScope;
pub use runtime::StoreEvent;
