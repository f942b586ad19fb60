// crates/convert-ssr-core/src/core/locals.rs
// ============================================================================
// Module: Render Locals
// Description: Per-request output of a bootstrap strategy.
// Purpose: Hand the snapshot and markup to the downstream template.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`RenderLocals`] is the response-local bag written by the bootstrap
//! middleware. It is created once per request and never mutated afterwards.

use serde::Deserialize;
use serde::Serialize;

use crate::core::snapshot::Snapshot;

/// Snapshot and markup produced for one request.
///
/// # Invariants
/// - A successful bootstrap always sets `snapshot`.
/// - `markup` is set only when markup rendering was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderLocals {
    /// Serialized store snapshot for client hydration.
    pub snapshot: Option<Snapshot>,
    /// Pre-rendered view markup.
    pub markup: Option<String>,
}

impl RenderLocals {
    /// Returns the snapshot size in bytes (zero when absent).
    #[must_use]
    pub fn snapshot_bytes(&self) -> usize {
        self.snapshot.as_ref().map_or(0, Snapshot::len)
    }

    /// Returns the markup size in bytes (zero when absent).
    #[must_use]
    pub fn markup_bytes(&self) -> usize {
        self.markup.as_ref().map_or(0, String::len)
    }
}
