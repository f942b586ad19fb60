// crates/convert-ssr-server/src/middleware.rs
// ============================================================================
// Module: Bootstrap Middleware
// Description: axum middleware that bootstraps render locals per request.
// Purpose: Run a bootstrap strategy and hand its locals to the page handler.
// Dependencies: axum, convert-ssr-core, tokio
// ============================================================================

//! ## Overview
//! [`bootstrap_middleware`] reads the instruction and render mode from the
//! query string, runs the configured [`BootstrapStrategy`] under a time
//! budget, and inserts the resulting [`RenderLocals`] into the request
//! extensions before calling the next handler.
//! Invariants:
//! - The next handler runs at most once per request.
//! - On bootstrap failure the next handler does not run; the error becomes
//!   the response.
//! - Each request emits exactly one audit event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use axum::Json;
use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use convert_ssr_core::BootstrapError;
use convert_ssr_core::BootstrapInstruction;
use convert_ssr_core::BootstrapStrategy;
use convert_ssr_core::DEFAULT_BOOTSTRAP_QUERY_KEY;
use convert_ssr_core::DEFAULT_MODE_QUERY_KEY;
use convert_ssr_core::QueryParams;
use convert_ssr_core::RenderLocals;
use convert_ssr_core::RenderMode;
use serde::Serialize;

use crate::audit::AuditSink;
use crate::audit::BootstrapAuditEvent;
use crate::audit::BootstrapAuditEventParams;
use crate::audit::BootstrapOutcome;

// ============================================================================
// SECTION: State
// ============================================================================

/// Default bootstrap time budget.
const DEFAULT_BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared middleware state.
#[derive(Clone)]
pub struct BootstrapState {
    /// Strategy that populates the store.
    strategy: Arc<dyn BootstrapStrategy>,
    /// Query parameter carrying the instruction.
    query_key: String,
    /// Query parameter carrying the render mode.
    mode_key: String,
    /// Time budget for one bootstrap.
    timeout: Duration,
    /// Audit sink for bootstrap decisions.
    audit: Arc<dyn AuditSink>,
}

impl BootstrapState {
    /// Creates middleware state with default query keys and time budget.
    #[must_use]
    pub fn new(strategy: Arc<dyn BootstrapStrategy>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            strategy,
            query_key: DEFAULT_BOOTSTRAP_QUERY_KEY.to_string(),
            mode_key: DEFAULT_MODE_QUERY_KEY.to_string(),
            timeout: DEFAULT_BOOTSTRAP_TIMEOUT,
            audit,
        }
    }

    /// Overrides the instruction and render mode query keys.
    #[must_use]
    pub fn with_query_keys(mut self, query_key: impl Into<String>, mode_key: impl Into<String>) -> Self {
        self.query_key = query_key.into();
        self.mode_key = mode_key.into();
        self
    }

    /// Overrides the bootstrap time budget.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the strategy name.
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Records one audit event.
    fn audit(&self, params: BootstrapAuditEventParams) {
        self.audit.record(&BootstrapAuditEvent::new(params));
    }
}

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Bootstraps render locals for the request, then runs the next handler.
pub async fn bootstrap_middleware(
    State(state): State<BootstrapState>,
    mut request: Request,
    next: Next,
) -> Response {
    let params = QueryParams::from_query_str(request.uri().query().unwrap_or_default());
    let path = request.uri().path().to_string();
    let mode = RenderMode::from_query(&params, &state.mode_key);
    let mut audit = BootstrapAuditEventParams {
        strategy: state.strategy_name(),
        view: state.strategy.view_name(),
        mode: mode.as_str(),
        path,
        types: None,
        outcome: BootstrapOutcome::Bypassed,
        error_kind: None,
        latency_ms: 0,
        snapshot_bytes: 0,
        markup_bytes: 0,
    };
    if mode == RenderMode::Disabled {
        state.audit(audit);
        return next.run(request).await;
    }
    let Some(instruction) = BootstrapInstruction::from_query(&params, &state.query_key) else {
        audit.outcome = BootstrapOutcome::NoInstruction;
        state.audit(audit);
        return next.run(request).await;
    };
    audit.types = Some(instruction.types.clone());

    let started = Instant::now();
    let result = run_bounded(&state, &instruction, mode).await;
    audit.latency_ms = started.elapsed().as_millis();
    match result {
        Ok(locals) => {
            audit.outcome = if locals.markup.is_some() {
                BootstrapOutcome::Rendered
            } else {
                BootstrapOutcome::DataOnly
            };
            audit.snapshot_bytes = locals.snapshot_bytes();
            audit.markup_bytes = locals.markup_bytes();
            state.audit(audit);
            request.extensions_mut().insert(locals);
            next.run(request).await
        }
        Err(error) => {
            audit.outcome = BootstrapOutcome::Failed;
            audit.error_kind = Some(error.kind());
            state.audit(audit);
            BootstrapRejection(error).into_response()
        }
    }
}

/// Runs the strategy under the configured time budget.
async fn run_bounded(
    state: &BootstrapState,
    instruction: &BootstrapInstruction,
    mode: RenderMode,
) -> Result<RenderLocals, BootstrapError> {
    match tokio::time::timeout(state.timeout, state.strategy.bootstrap(instruction, mode)).await {
        Ok(result) => result,
        Err(_) => {
            let budget_ms = u64::try_from(state.timeout.as_millis()).unwrap_or(u64::MAX);
            Err(BootstrapError::Timeout(budget_ms))
        }
    }
}

// ============================================================================
// SECTION: Rejection
// ============================================================================

/// Bootstrap failure rendered as an HTTP response.
#[derive(Debug)]
pub struct BootstrapRejection(pub BootstrapError);

/// JSON body of a bootstrap rejection.
#[derive(Debug, Serialize)]
struct RejectionBody {
    /// Normalized error kind label.
    error: &'static str,
    /// Human-readable message.
    message: String,
}

impl BootstrapRejection {
    /// Returns the HTTP status for the wrapped error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self.0 {
            BootstrapError::Fetch(_) | BootstrapError::Action(_) => StatusCode::BAD_GATEWAY,
            BootstrapError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            BootstrapError::Store(_) | BootstrapError::Render(_) | BootstrapError::Incomplete => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for BootstrapRejection {
    fn into_response(self) -> Response {
        let body = RejectionBody {
            error: self.0.kind(),
            message: self.0.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

// ============================================================================
// SECTION: Direct Rendering
// ============================================================================

impl BootstrapState {
    /// Resolves render locals for a raw query string without an HTTP request.
    ///
    /// Returns `Ok(None)` when the render mode is disabled or no instruction
    /// is present. Audit events are not recorded.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError`] when the strategy fails or times out.
    pub async fn render_query(&self, raw_query: &str) -> Result<Option<RenderLocals>, BootstrapError> {
        let params = QueryParams::from_query_str(raw_query);
        let mode = RenderMode::from_query(&params, &self.mode_key);
        if mode == RenderMode::Disabled {
            return Ok(None);
        }
        let Some(instruction) = BootstrapInstruction::from_query(&params, &self.query_key) else {
            return Ok(None);
        };
        run_bounded(self, &instruction, mode).await.map(Some)
    }
}
