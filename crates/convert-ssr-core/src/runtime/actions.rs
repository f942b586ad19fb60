// crates/convert-ssr-core/src/runtime/actions.rs
// ============================================================================
// Module: Conversion Actions
// Description: Named operations that mutate the conversion store.
// Purpose: Drive store updates and announce fetch outcomes via the dispatcher.
// Dependencies: crate::interfaces, crate::runtime::{dispatcher, store}
// ============================================================================

//! ## Overview
//! [`ConversionActions`] binds one store, one dispatcher, and one conversion
//! client. Setters are synchronous; [`ConversionActions::fetch_conversions`]
//! is the only suspension point and always emits exactly one event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::interfaces::ConversionClient;
use crate::interfaces::FetchError;
use crate::interfaces::StoreError;
use crate::runtime::dispatcher::Dispatcher;
use crate::runtime::dispatcher::EventPayload;
use crate::runtime::store::Action;
use crate::runtime::store::ConversionStore;

// ============================================================================
// SECTION: Conversion Actions
// ============================================================================

/// Action set bound to a request-scoped store and dispatcher.
#[derive(Clone)]
pub struct ConversionActions {
    /// Store mutated by the actions.
    store: Arc<ConversionStore>,
    /// Dispatcher receiving completion events.
    dispatcher: Arc<Dispatcher>,
    /// Client used by the fetch action.
    client: Arc<dyn ConversionClient>,
}

impl ConversionActions {
    /// Binds actions to a store, dispatcher, and client.
    #[must_use]
    pub fn new(
        store: Arc<ConversionStore>,
        dispatcher: Arc<Dispatcher>,
        client: Arc<dyn ConversionClient>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            client,
        }
    }

    /// Sets the requested conversion types.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    pub fn set_types(&self, types: impl Into<String>) -> Result<(), StoreError> {
        self.store.apply(Action::SetTypes(types.into()))
    }

    /// Sets the value to convert.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    pub fn set_value(&self, value: impl Into<String>) -> Result<(), StoreError> {
        self.store.apply(Action::SetValue(value.into()))
    }

    /// Fetches conversions for the types and value held by the store.
    ///
    /// Emits [`EventPayload::ConversionsUpdated`] once the data is stored, or
    /// [`EventPayload::ConversionError`] when the fetch or the store update
    /// fails. Outcomes are reported only through the dispatcher.
    pub async fn fetch_conversions(&self) {
        let request = match self.store.state() {
            Ok(state) => state,
            Err(err) => {
                self.dispatcher
                    .emit(&EventPayload::ConversionError(FetchError::Rejected(err.to_string())));
                return;
            }
        };
        let result = self.client.fetch(&request.types, &request.value).await;
        let event = match result {
            Ok(data) => match self.store.apply(Action::ReceiveConversions(data)) {
                Ok(()) => EventPayload::ConversionsUpdated,
                Err(err) => EventPayload::ConversionError(FetchError::Rejected(err.to_string())),
            },
            Err(err) => match self.store.apply(Action::ReceiveError(err.to_string())) {
                Ok(()) => EventPayload::ConversionError(err),
                Err(store_err) => EventPayload::ConversionError(FetchError::Rejected(format!(
                    "{err}; recording it failed: {store_err}"
                ))),
            },
        };
        self.dispatcher.emit(&event);
    }
}
