// crates/convert-ssr-core/src/runtime/fetch_first.rs
// ============================================================================
// Module: Fetch-First Strategy
// Description: Bootstrap by fetching conversion data before touching a store.
// Purpose: Populate, snapshot, and render a store seeded from a direct fetch.
// Dependencies: crate::core, crate::interfaces, crate::runtime, serde_json
// ============================================================================

//! ## Overview
//! The fetch-first strategy awaits the conversion client, then seeds a fresh
//! [`ConversionStore`] from a snapshot holding the fetched data and the
//! original `types`/`value`. The store only exists after the fetch resolves
//! and is dropped once the locals are captured, so a failed fetch leaves
//! nothing behind and concurrent requests never share state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Map;

use crate::core::BootstrapInstruction;
use crate::core::CONVERSIONS_SLOT;
use crate::core::ConversionData;
use crate::core::ConversionsState;
use crate::core::RenderLocals;
use crate::core::RenderMode;
use crate::core::Snapshot;
use crate::interfaces::BootstrapError;
use crate::interfaces::BootstrapStrategy;
use crate::interfaces::ConversionClient;
use crate::interfaces::Store;
use crate::interfaces::StoreError;
use crate::interfaces::View;
use crate::runtime::capture::capture_locals;
use crate::runtime::store::ConversionStore;

// ============================================================================
// SECTION: Strategy
// ============================================================================

/// Strategy that fetches first and seeds a request-scoped store.
#[derive(Clone)]
pub struct FetchFirstStrategy {
    /// Client used for the direct fetch.
    client: Arc<dyn ConversionClient>,
    /// View rendered against the seeded store.
    view: Arc<dyn View>,
}

impl FetchFirstStrategy {
    /// Creates a fetch-first strategy.
    #[must_use]
    pub fn new(client: Arc<dyn ConversionClient>, view: Arc<dyn View>) -> Self {
        Self {
            client,
            view,
        }
    }
}

#[async_trait]
impl BootstrapStrategy for FetchFirstStrategy {
    fn name(&self) -> &'static str {
        "fetch_first"
    }

    fn view_name(&self) -> &'static str {
        self.view.name()
    }

    async fn bootstrap(
        &self,
        instruction: &BootstrapInstruction,
        mode: RenderMode,
    ) -> Result<RenderLocals, BootstrapError> {
        if mode == RenderMode::Disabled {
            return Ok(RenderLocals::default());
        }
        let data = self
            .client
            .fetch(&instruction.types, &instruction.value)
            .await
            .map_err(BootstrapError::Fetch)?;
        let store = ConversionStore::new();
        store.bootstrap(&seed_snapshot(instruction, data)?)?;
        capture_locals(&store, self.view.as_ref(), mode)
    }
}

/// Builds the snapshot that seeds the conversions slot.
fn seed_snapshot(
    instruction: &BootstrapInstruction,
    data: ConversionData,
) -> Result<Snapshot, StoreError> {
    let state = ConversionsState {
        types: instruction.types.clone(),
        value: instruction.value.clone(),
        conversions: Some(data),
        error: None,
    };
    let slot = serde_json::to_value(state).map_err(|err| StoreError::Snapshot(err.to_string()))?;
    let mut slots = Map::new();
    slots.insert(CONVERSIONS_SLOT.to_string(), slot);
    Snapshot::from_slots(&slots).map_err(|err| StoreError::Snapshot(err.to_string()))
}
