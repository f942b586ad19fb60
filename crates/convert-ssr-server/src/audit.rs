// crates/convert-ssr-server/src/audit.rs
// ============================================================================
// Module: Bootstrap Audit Logging
// Description: Structured audit events for bootstrap middleware decisions.
// Purpose: Emit one JSON line per bootstrap decision without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every request that passes through the bootstrap middleware produces exactly
//! one [`BootstrapAuditEvent`]. Sinks serialize events as JSON lines; write
//! failures are swallowed so logging never fails a request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome of a single bootstrap decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootstrapOutcome {
    /// Render mode disabled server rendering.
    Bypassed,
    /// No bootstrap instruction was present.
    NoInstruction,
    /// Snapshot and markup were produced.
    Rendered,
    /// Only the snapshot was produced.
    DataOnly,
    /// Bootstrap failed and the request was rejected.
    Failed,
}

/// Bootstrap audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Strategy that handled the request.
    pub strategy: &'static str,
    /// View the strategy renders.
    pub view: &'static str,
    /// Resolved render mode label.
    pub mode: &'static str,
    /// Request path.
    pub path: String,
    /// Requested conversion types when an instruction was present.
    pub types: Option<String>,
    /// Decision outcome.
    pub outcome: BootstrapOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Time spent bootstrapping, in milliseconds.
    pub latency_ms: u128,
    /// Snapshot size in bytes.
    pub snapshot_bytes: usize,
    /// Markup size in bytes.
    pub markup_bytes: usize,
}

/// Inputs for constructing a bootstrap audit event.
#[derive(Debug, Clone)]
pub struct BootstrapAuditEventParams {
    /// Strategy that handled the request.
    pub strategy: &'static str,
    /// View the strategy renders.
    pub view: &'static str,
    /// Resolved render mode label.
    pub mode: &'static str,
    /// Request path.
    pub path: String,
    /// Requested conversion types.
    pub types: Option<String>,
    /// Decision outcome.
    pub outcome: BootstrapOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Time spent bootstrapping, in milliseconds.
    pub latency_ms: u128,
    /// Snapshot size in bytes.
    pub snapshot_bytes: usize,
    /// Markup size in bytes.
    pub markup_bytes: usize,
}

impl BootstrapAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: BootstrapAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "ssr_bootstrap",
            timestamp_ms,
            strategy: params.strategy,
            view: params.view,
            mode: params.mode,
            path: params.path,
            types: params.types,
            outcome: params.outcome,
            error_kind: params.error_kind,
            latency_ms: params.latency_ms,
            snapshot_bytes: params.snapshot_bytes,
            markup_bytes: params.markup_bytes,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for bootstrap events.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &BootstrapAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &BootstrapAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record(&self, event: &BootstrapAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &BootstrapAuditEvent) {}
}
