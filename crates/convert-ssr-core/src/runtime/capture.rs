// crates/convert-ssr-core/src/runtime/capture.rs
// ============================================================================
// Module: Render Capture
// Description: Snapshot-then-render step shared by both strategies.
// Purpose: Produce render locals from a populated store.
// Dependencies: crate::core, crate::interfaces, crate::runtime::store
// ============================================================================

//! ## Overview
//! Captures the store snapshot and, when the mode asks for markup, renders the
//! view against the same store state.

use crate::core::RenderLocals;
use crate::core::RenderMode;
use crate::interfaces::BootstrapError;
use crate::interfaces::Store;
use crate::interfaces::View;
use crate::runtime::store::ConversionStore;

/// Snapshots `store` and renders `view` when `mode` requests markup.
///
/// # Errors
///
/// Returns [`BootstrapError`] when snapshotting or rendering fails.
pub(crate) fn capture_locals(
    store: &ConversionStore,
    view: &dyn View,
    mode: RenderMode,
) -> Result<RenderLocals, BootstrapError> {
    let snapshot = store.take_snapshot()?;
    let markup = if mode.renders_markup() {
        let state = store.state()?;
        Some(view.render_to_string(&state)?)
    } else {
        None
    };
    Ok(RenderLocals {
        snapshot: Some(snapshot),
        markup,
    })
}
