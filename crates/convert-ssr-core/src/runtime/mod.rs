// crates/convert-ssr-core/src/runtime/mod.rs
// ============================================================================
// Module: Convert SSR Runtime
// Description: Store, dispatcher, actions, view, and bootstrap strategies.
// Purpose: Implement the per-request bootstrap flow behind the interfaces.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The runtime provides the concrete store and dispatcher, the conversion
//! actions, a built-in view, an in-memory conversion client, and the two
//! [`crate::BootstrapStrategy`] implementations.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod actions;
pub mod actions_strategy;
mod capture;
pub mod client;
pub mod dispatcher;
pub mod fetch_first;
pub mod store;
pub mod view;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use actions::ConversionActions;
pub use actions_strategy::ActionsStrategy;
pub use actions_strategy::RequestScope;
pub use actions_strategy::ScopeOutcome;
pub use client::InMemoryConversionClient;
pub use dispatcher::Dispatcher;
pub use dispatcher::EventPayload;
pub use dispatcher::ListenerId;
pub use dispatcher::StoreEvent;
pub use fetch_first::FetchFirstStrategy;
pub use store::Action;
pub use store::ConversionStore;
pub use view::ConverterView;
pub use view::escape_html;
