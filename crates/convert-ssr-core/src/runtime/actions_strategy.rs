// crates/convert-ssr-core/src/runtime/actions_strategy.rs
// ============================================================================
// Module: Actions Strategy
// Description: Bootstrap by firing conversion actions against a request scope.
// Purpose: Resolve action completion events into a single awaited result.
// Dependencies: crate::core, crate::interfaces, crate::runtime, tokio
// ============================================================================

//! ## Overview
//! Each request gets a [`RequestScope`]: a fresh store and dispatcher. The
//! scope is armed with one success and one error listener that share a
//! single-use result channel. Whichever event fires first captures the
//! outcome, tears the scope down, and completes the channel; the strategy
//! awaits that channel rather than polling store state.
//! Invariants:
//! - Teardown runs at most once per scope and removes every listener.
//! - A dropped scope (cancelled or timed-out request) is torn down on drop.
//! - Exactly one of success or error reaches the caller.
//! - A scope finished before any event fired yields
//!   [`BootstrapError::Incomplete`] instead of waiting forever.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::Weak;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::core::BootstrapInstruction;
use crate::core::RenderLocals;
use crate::core::RenderMode;
use crate::interfaces::BootstrapError;
use crate::interfaces::BootstrapStrategy;
use crate::interfaces::ConversionClient;
use crate::interfaces::FetchError;
use crate::interfaces::Store;
use crate::interfaces::View;
use crate::runtime::actions::ConversionActions;
use crate::runtime::capture::capture_locals;
use crate::runtime::dispatcher::Dispatcher;
use crate::runtime::dispatcher::EventPayload;
use crate::runtime::dispatcher::StoreEvent;
use crate::runtime::store::ConversionStore;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome delivered through the scope's result channel.
pub type ScopeOutcome = Result<RenderLocals, BootstrapError>;

/// Single-use sender shared by the success and error listeners.
type SharedSender = Arc<Mutex<Option<oneshot::Sender<ScopeOutcome>>>>;

// ============================================================================
// SECTION: Request Scope
// ============================================================================

/// Store and dispatcher owned by a single request.
#[derive(Debug, Default)]
pub struct RequestScope {
    /// Request-scoped store.
    store: Arc<ConversionStore>,
    /// Request-scoped listener registry.
    dispatcher: Arc<Dispatcher>,
    /// Set once teardown has run.
    torn_down: AtomicBool,
}

impl RequestScope {
    /// Creates a new scope with an empty store and dispatcher.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns the scope's store.
    #[must_use]
    pub const fn store(&self) -> &Arc<ConversionStore> {
        &self.store
    }

    /// Returns the scope's dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Returns true once teardown has run.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Registers the success and error listeners and returns the receiver
    /// that resolves with the first outcome.
    ///
    /// On success the listener snapshots the store and renders `view` (when
    /// `mode` asks for markup) before tearing the scope down.
    pub fn arm(
        self: &Arc<Self>,
        view: Arc<dyn View>,
        mode: RenderMode,
    ) -> oneshot::Receiver<ScopeOutcome> {
        let (sender, receiver) = oneshot::channel();
        let sender: SharedSender = Arc::new(Mutex::new(Some(sender)));

        let scope = Arc::downgrade(self);
        let success = Arc::clone(&sender);
        self.dispatcher.subscribe(StoreEvent::ConversionsUpdated, move |_| {
            complete(&scope, &success, |scope| capture_locals(&scope.store, view.as_ref(), mode));
        });

        let scope = Arc::downgrade(self);
        self.dispatcher.subscribe(StoreEvent::ConversionError, move |payload| {
            complete(&scope, &sender, |_| {
                let error = match payload {
                    EventPayload::ConversionError(error) => error.clone(),
                    EventPayload::ConversionsUpdated => {
                        FetchError::Rejected("unexpected event routed to error listener".to_string())
                    }
                };
                Err(BootstrapError::Action(error))
            });
        });
        receiver
    }

    /// Tears the scope down and resolves `receiver`.
    ///
    /// # Errors
    ///
    /// Returns the error delivered by the error listener, or
    /// [`BootstrapError::Incomplete`] when no listener fired before teardown.
    pub async fn finish(&self, receiver: oneshot::Receiver<ScopeOutcome>) -> ScopeOutcome {
        self.teardown();
        receiver.await.unwrap_or(Err(BootstrapError::Incomplete))
    }

    /// Removes every listener and flushes the store.
    ///
    /// Returns true when this call performed the teardown, false when it had
    /// already run.
    pub fn teardown(&self) -> bool {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.dispatcher.remove_all_listeners();
        // Flush failure only means the store was poisoned; it is discarded anyway.
        let _ = self.store.flush();
        true
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Resolves the shared sender once: computes the outcome, tears the scope
/// down, and sends.
fn complete<F>(scope: &Weak<RequestScope>, sender: &SharedSender, outcome: F)
where
    F: FnOnce(&RequestScope) -> ScopeOutcome,
{
    let Some(scope) = scope.upgrade() else {
        return;
    };
    let Some(sender) = sender.lock().unwrap_or_else(PoisonError::into_inner).take() else {
        return;
    };
    let result = outcome(&scope);
    scope.teardown();
    // Receiver dropped means the request was abandoned.
    let _ = sender.send(result);
}

// ============================================================================
// SECTION: Strategy
// ============================================================================

/// Strategy that fires conversion actions against a fresh request scope.
#[derive(Clone)]
pub struct ActionsStrategy {
    /// Client used by the fetch action.
    client: Arc<dyn ConversionClient>,
    /// View rendered on success.
    view: Arc<dyn View>,
}

impl ActionsStrategy {
    /// Creates an actions strategy.
    #[must_use]
    pub fn new(client: Arc<dyn ConversionClient>, view: Arc<dyn View>) -> Self {
        Self {
            client,
            view,
        }
    }
}

#[async_trait]
impl BootstrapStrategy for ActionsStrategy {
    fn name(&self) -> &'static str {
        "actions"
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
        let scope = RequestScope::new();
        let receiver = scope.arm(Arc::clone(&self.view), mode);
        let actions = ConversionActions::new(
            Arc::clone(scope.store()),
            Arc::clone(scope.dispatcher()),
            Arc::clone(&self.client),
        );
        actions.set_types(instruction.types.as_str())?;
        actions.set_value(instruction.value.as_str())?;
        actions.fetch_conversions().await;
        scope.finish(receiver).await
    }
}
