// crates/convert-ssr-core/src/runtime/client.rs
// ============================================================================
// Module: In-Memory Conversion Client
// Description: Fixture-backed conversion client for tests and offline use.
// Purpose: Provide a deterministic client without network access.
// Dependencies: crate::core, crate::interfaces, tokio
// ============================================================================

//! ## Overview
//! [`InMemoryConversionClient`] serves conversion data from a fixture table
//! keyed by `types`. It can be told to fail every call or to wait before
//! answering, which is how suspension and timeouts are exercised in tests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::ConversionData;
use crate::interfaces::ConversionClient;
use crate::interfaces::FetchError;

// ============================================================================
// SECTION: In-Memory Client
// ============================================================================

/// Fixture-backed conversion client.
#[derive(Debug, Default)]
pub struct InMemoryConversionClient {
    /// Conversion data keyed by types.
    fixtures: BTreeMap<String, ConversionData>,
    /// Error returned by every call when set.
    failure: Option<FetchError>,
    /// Artificial latency applied before answering.
    delay: Option<Duration>,
    /// Number of fetches served.
    calls: AtomicUsize,
}

impl InMemoryConversionClient {
    /// Creates a client with no fixtures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds conversion data for `types`.
    #[must_use]
    pub fn with_fixture(mut self, types: impl Into<String>, data: impl Into<ConversionData>) -> Self {
        self.fixtures.insert(types.into(), data.into());
        self
    }

    /// Makes every fetch fail with `error`.
    #[must_use]
    pub fn with_failure(mut self, error: FetchError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Delays every fetch by `delay`.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns the number of fetches served so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConversionClient for InMemoryConversionClient {
    async fn fetch(&self, types: &str, _value: &str) -> Result<ConversionData, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.fixtures.get(types).cloned().ok_or_else(|| FetchError::NotFound(types.to_string()))
    }
}
