// crates/convert-ssr-core/src/runtime/dispatcher.rs
// ============================================================================
// Module: Action Dispatcher
// Description: Per-request event registry for action completion events.
// Purpose: Let strategies observe action outcomes through listeners.
// Dependencies: crate::interfaces, std
// ============================================================================

//! ## Overview
//! The [`Dispatcher`] holds listener registrations keyed by [`StoreEvent`].
//! Listeners are cloned out of the registry before they run, so a listener
//! may unsubscribe itself or clear the whole registry while it is executing.
//! Invariants:
//! - [`ListenerId`] values are unique per dispatcher.
//! - After [`Dispatcher::remove_all_listeners`] no prior listener is invoked again.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::interfaces::FetchError;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Event kinds a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StoreEvent {
    /// Conversion data landed in the store.
    ConversionsUpdated,
    /// Conversion fetch failed.
    ConversionError,
}

/// Event emitted to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// Conversion data landed in the store.
    ConversionsUpdated,
    /// Conversion fetch failed with the given error.
    ConversionError(FetchError),
}

impl EventPayload {
    /// Returns the event kind for routing.
    #[must_use]
    pub const fn kind(&self) -> StoreEvent {
        match self {
            Self::ConversionsUpdated => StoreEvent::ConversionsUpdated,
            Self::ConversionError(_) => StoreEvent::ConversionError,
        }
    }
}

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Identifier returned by [`Dispatcher::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Listener callback signature.
type Listener = dyn Fn(&EventPayload) + Send + Sync;

/// Registered listener with its event kind.
struct Registration {
    /// Event kind the listener is bound to.
    event: StoreEvent,
    /// Callback invoked on emission.
    listener: Arc<Listener>,
}

/// Listener registry for a single request.
#[derive(Default)]
pub struct Dispatcher {
    /// Registered listeners ordered by subscription.
    registrations: Mutex<BTreeMap<ListenerId, Registration>>,
    /// Next listener identifier.
    next_id: AtomicU64,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").field("listeners", &self.listener_count()).finish()
    }
}

impl Dispatcher {
    /// Creates an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for `event`.
    pub fn subscribe<F>(&self, event: StoreEvent, listener: F) -> ListenerId
    where
        F: Fn(&EventPayload) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.registrations().insert(
            id,
            Registration {
                event,
                listener: Arc::new(listener),
            },
        );
        id
    }

    /// Removes a single listener. Returns true when it was registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.registrations().remove(&id).is_some()
    }

    /// Removes every listener. Returns the number removed.
    pub fn remove_all_listeners(&self) -> usize {
        let removed = std::mem::take(&mut *self.registrations());
        removed.len()
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registrations().len()
    }

    /// Emits an event to matching listeners. Returns the number invoked.
    ///
    /// A listener removed by an earlier listener of the same emission is skipped.
    pub fn emit(&self, payload: &EventPayload) -> usize {
        let kind = payload.kind();
        let listeners: Vec<(ListenerId, Arc<Listener>)> = self
            .registrations()
            .iter()
            .filter(|(_, registration)| registration.event == kind)
            .map(|(id, registration)| (*id, Arc::clone(&registration.listener)))
            .collect();
        let mut invoked = 0;
        for (id, listener) in listeners {
            if !self.registrations().contains_key(&id) {
                continue;
            }
            listener(payload);
            invoked += 1;
        }
        invoked
    }

    /// Locks the registry. Registrations are replaced whole, so a poisoned
    /// lock still guards a consistent map.
    fn registrations(&self) -> MutexGuard<'_, BTreeMap<ListenerId, Registration>> {
        self.registrations.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
