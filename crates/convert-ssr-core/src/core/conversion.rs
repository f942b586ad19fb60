// crates/convert-ssr-core/src/core/conversion.rs
// ============================================================================
// Module: Conversion State
// Description: Conversion payloads and the conversions store slot.
// Purpose: Define the single sub-state written into store snapshots.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Conversion data is opaque JSON returned by the conversion service. The
//! store keeps it under the [`CONVERSIONS_SLOT`] together with the `types` and
//! `value` that produced it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Snapshot slot holding [`ConversionsState`].
pub const CONVERSIONS_SLOT: &str = "ConversionsStore";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Opaque conversion payload returned by a conversion client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversionData(pub Value);

impl ConversionData {
    /// Returns the underlying JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for ConversionData {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// State stored under the conversions slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionsState {
    /// Conversion types requested.
    #[serde(default)]
    pub types: String,
    /// Value being converted.
    #[serde(default)]
    pub value: String,
    /// Conversion data once fetched.
    #[serde(default)]
    pub conversions: Option<ConversionData>,
    /// Last conversion error message.
    #[serde(default)]
    pub error: Option<String>,
}

impl ConversionsState {
    /// Returns true when nothing has been written to the slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
