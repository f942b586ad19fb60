// crates/convert-ssr-core/src/interfaces/mod.rs
// ============================================================================
// Module: Convert SSR Interfaces
// Description: Contract surfaces for fetching, storing, rendering, and bootstrapping.
// Purpose: Keep the bootstrap flow independent of HTTP and view backends.
// Dependencies: crate::core, async-trait, thiserror
// ============================================================================

//! ## Overview
//! Interfaces describe the collaborators of the bootstrap flow: a conversion
//! client that fetches data over the network, a store that can be bootstrapped
//! from and snapshotted to a [`Snapshot`], a view that renders store state to
//! markup, and the strategy that ties them together for a single request.
//! Implementations must not leak state between requests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

use crate::core::BootstrapInstruction;
use crate::core::ConversionData;
use crate::core::ConversionsState;
use crate::core::RenderLocals;
use crate::core::RenderMode;
use crate::core::Snapshot;

// ============================================================================
// SECTION: Conversion Client
// ============================================================================

/// Errors raised while fetching conversion data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport-level failure (connect, TLS, I/O).
    #[error("conversion fetch transport error: {0}")]
    Transport(String),
    /// Service answered with a non-success status.
    #[error("conversion service returned status {0}")]
    Status(u16),
    /// Response body could not be decoded.
    #[error("conversion response decode error: {0}")]
    Decode(String),
    /// Request or response was refused by local policy or store state.
    #[error("conversion request rejected: {0}")]
    Rejected(String),
    /// No conversion data exists for the requested types.
    #[error("no conversion data for types {0}")]
    NotFound(String),
}

/// Network collaborator that retrieves conversion data.
#[async_trait]
pub trait ConversionClient: Send + Sync {
    /// Fetches conversion data keyed by `types` and `value`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the data cannot be retrieved.
    async fn fetch(&self, types: &str, value: &str) -> Result<ConversionData, FetchError>;
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Snapshot could not be produced or applied.
    #[error("store snapshot error: {0}")]
    Snapshot(String),
    /// Store lock was poisoned by a panicking writer.
    #[error("store unavailable: {0}")]
    Poisoned(String),
}

/// Unidirectional data container that can round-trip through snapshots.
pub trait Store: Send + Sync {
    /// Replaces store state with the slots found in `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the snapshot is malformed.
    fn bootstrap(&self, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// Captures the full store state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the state cannot be serialized.
    fn take_snapshot(&self) -> Result<Snapshot, StoreError>;

    /// Resets the store to a clean state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot be locked.
    fn flush(&self) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: View
// ============================================================================

/// View rendering errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// View failed to produce markup.
    #[error("view render failed: {0}")]
    Render(String),
}

/// Renderable view bound to conversion store state.
pub trait View: Send + Sync {
    /// Returns a stable view name, recorded in bootstrap audit events.
    fn name(&self) -> &'static str;

    /// Renders the view for the given store state.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when markup cannot be produced.
    fn render_to_string(&self, state: &ConversionsState) -> Result<String, RenderError>;
}

// ============================================================================
// SECTION: Bootstrap Strategy
// ============================================================================

/// Errors that abort a bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    /// Direct network fetch failed.
    #[error(transparent)]
    Fetch(FetchError),
    /// Fetch action reported a conversion error event.
    #[error("conversion action failed: {0}")]
    Action(FetchError),
    /// Store failed to bootstrap or snapshot.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// View failed to render.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// Actions finished without emitting a completion event.
    #[error("conversion actions completed without a result event")]
    Incomplete,
    /// Bootstrap exceeded its time budget.
    #[error("bootstrap timed out after {0} ms")]
    Timeout(u64),
}

impl BootstrapError {
    /// Returns a stable label for audit and response mapping.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch_failed",
            Self::Action(_) => "action_failed",
            Self::Store(_) => "store_failed",
            Self::Render(_) => "render_failed",
            Self::Incomplete => "incomplete",
            Self::Timeout(_) => "timeout",
        }
    }
}

/// Strategy that populates a store and renders a view for one request.
#[async_trait]
pub trait BootstrapStrategy: Send + Sync {
    /// Returns a stable strategy name for audit labeling.
    fn name(&self) -> &'static str;

    /// Returns the name of the view rendered on success.
    fn view_name(&self) -> &'static str;

    /// Runs the bootstrap for one instruction.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError`] when fetching, storing, or rendering fails.
    /// No partial [`RenderLocals`] are produced on failure.
    async fn bootstrap(
        &self,
        instruction: &BootstrapInstruction,
        mode: RenderMode,
    ) -> Result<RenderLocals, BootstrapError>;
}
