// crates/convert-ssr-core/src/core/snapshot.rs
// ============================================================================
// Module: Store Snapshot
// Description: Serialized representation of store state at a point in time.
// Purpose: Carry store state verbatim from the server to the hydrating client.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Snapshot`] is the JSON text of a store, an object keyed by slot name.
//! It is produced by [`crate::Store::take_snapshot`] and embedded verbatim into
//! the response; nothing downstream inspects it beyond the slot it wrote.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Snapshot
// ============================================================================

/// Serialized store state.
///
/// # Invariants
/// - Snapshots built through [`Snapshot::from_slots`] always hold a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(String);

impl Snapshot {
    /// Wraps raw snapshot text without validating it.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Serializes a slot map into a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when serialization fails.
    pub fn from_slots(slots: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::to_string(slots).map(Self)
    }

    /// Parses the snapshot back into its slot map.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the text is not a JSON object.
    pub fn slots(&self) -> Result<Map<String, Value>, serde_json::Error> {
        serde_json::from_str(&self.0)
    }

    /// Returns the snapshot text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the snapshot size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the snapshot text is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
