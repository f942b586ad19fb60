// crates/convert-ssr-core/src/runtime/store.rs
// ============================================================================
// Module: Conversion Store
// Description: Request-scoped store holding the conversions slot.
// Purpose: Provide bootstrap/snapshot/flush over conversion state.
// Dependencies: crate::core, crate::interfaces, serde_json
// ============================================================================

//! ## Overview
//! [`ConversionStore`] is the only store in the system. It is created per
//! request by both strategies and dropped when the request finishes, so no
//! state survives from one request to the next. State changes go through
//! [`ConversionStore::apply`] with an [`Action`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::sync::MutexGuard;

use serde_json::Map;

use crate::core::CONVERSIONS_SLOT;
use crate::core::ConversionData;
use crate::core::ConversionsState;
use crate::core::Snapshot;
use crate::interfaces::Store;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Actions
// ============================================================================

/// State transitions accepted by [`ConversionStore::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Sets the requested conversion types.
    SetTypes(String),
    /// Sets the value being converted.
    SetValue(String),
    /// Stores fetched conversion data and clears any prior error.
    ReceiveConversions(ConversionData),
    /// Records a conversion failure message.
    ReceiveError(String),
}

// ============================================================================
// SECTION: Conversion Store
// ============================================================================

/// In-memory store for the conversions slot.
#[derive(Debug, Default)]
pub struct ConversionStore {
    /// Conversions slot protected by a mutex.
    state: Mutex<ConversionsState>,
}

impl ConversionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an action to the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store lock is poisoned.
    pub fn apply(&self, action: Action) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        match action {
            Action::SetTypes(types) => state.types = types,
            Action::SetValue(value) => state.value = value,
            Action::ReceiveConversions(data) => {
                state.conversions = Some(data);
                state.error = None;
            }
            Action::ReceiveError(message) => state.error = Some(message),
        }
        drop(state);
        Ok(())
    }

    /// Returns a copy of the current conversions state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store lock is poisoned.
    pub fn state(&self) -> Result<ConversionsState, StoreError> {
        Ok(self.lock()?.clone())
    }

    /// Locks the conversions slot.
    fn lock(&self) -> Result<MutexGuard<'_, ConversionsState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Poisoned("conversion store mutex poisoned".to_string()))
    }
}

impl Store for ConversionStore {
    fn bootstrap(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let slots = snapshot.slots().map_err(|err| StoreError::Snapshot(err.to_string()))?;
        let next = match slots.get(CONVERSIONS_SLOT) {
            Some(slot) => serde_json::from_value::<ConversionsState>(slot.clone())
                .map_err(|err| StoreError::Snapshot(format!("{CONVERSIONS_SLOT}: {err}")))?,
            None => ConversionsState::default(),
        };
        *self.lock()? = next;
        Ok(())
    }

    fn take_snapshot(&self) -> Result<Snapshot, StoreError> {
        let state = self.state()?;
        let slot =
            serde_json::to_value(&state).map_err(|err| StoreError::Snapshot(err.to_string()))?;
        let mut slots = Map::new();
        slots.insert(CONVERSIONS_SLOT.to_string(), slot);
        Snapshot::from_slots(&slots).map_err(|err| StoreError::Snapshot(err.to_string()))
    }

    fn flush(&self) -> Result<(), StoreError> {
        *self.lock()? = ConversionsState::default();
        Ok(())
    }
}

#[cfg(test)]
impl ConversionStore {
    /// Poisons the store lock by panicking while it is held.
    #[allow(clippy::panic, reason = "Test helper poisons the mutex through a panic.")]
    pub(crate) fn poison(&self) {
        std::thread::scope(|scope| {
            let _ = scope
                .spawn(|| {
                    let _guard = self.state.lock();
                    panic!("poisoning conversion store");
                })
                .join();
        });
    }
}
