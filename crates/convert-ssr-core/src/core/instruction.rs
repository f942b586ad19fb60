// crates/convert-ssr-core/src/core/instruction.rs
// ============================================================================
// Module: Bootstrap Instruction
// Description: Query parameter decoding and bootstrap instruction parsing.
// Purpose: Turn an incoming query string into a typed bootstrap decision.
// Dependencies: serde, url
// ============================================================================

//! ## Overview
//! A bootstrap instruction travels in a single query parameter of the form
//! `<types>:<value>`. Parsing never fails: a missing parameter or an empty
//! `types` segment yields `None`, which the middleware treats as a pass-through.
//! The render mode travels in a second parameter and decides whether the
//! request is bypassed entirely, populated without markup, or fully rendered.
//! Invariants:
//! - `types` is never empty on a parsed instruction.
//! - `value` is taken verbatim; no further validation happens here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default query key carrying the `<types>:<value>` instruction.
pub const DEFAULT_BOOTSTRAP_QUERY_KEY: &str = "convert";
/// Default query key carrying the render mode.
pub const DEFAULT_MODE_QUERY_KEY: &str = "mode";
/// Mode value that disables server-side rendering for the request.
pub const NO_SSR_MODE: &str = "nossr";
/// Mode value that populates the snapshot without rendering markup.
pub const DATA_ONLY_MODE: &str = "data";

// ============================================================================
// SECTION: Query Parameters
// ============================================================================

/// Decoded query parameters for a single request.
///
/// # Invariants
/// - Keys are unique; a repeated key keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Decoded key/value pairs.
    params: BTreeMap<String, String>,
}

impl QueryParams {
    /// Decodes an `application/x-www-form-urlencoded` query string.
    #[must_use]
    pub fn from_query_str(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let params = url::form_urlencoded::parse(raw.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Self {
            params,
        }
    }

    /// Returns the value for `key` when present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

// ============================================================================
// SECTION: Bootstrap Instruction
// ============================================================================

/// Parsed `{types, value}` pair driving what data to fetch.
///
/// # Invariants
/// - `types` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapInstruction {
    /// Conversion types requested by the client.
    pub types: String,
    /// Value to convert (may be empty).
    pub value: String,
}

impl BootstrapInstruction {
    /// Parses a raw `<types>:<value>` string.
    ///
    /// Splits on the first colon only, so `value` may itself contain colons.
    /// Returns `None` when `types` is empty.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (types, value) = raw.split_once(':').unwrap_or((raw, ""));
        if types.is_empty() {
            return None;
        }
        Some(Self {
            types: types.to_string(),
            value: value.to_string(),
        })
    }

    /// Looks up `key` in the query parameters and parses its value.
    #[must_use]
    pub fn from_query(params: &QueryParams, key: &str) -> Option<Self> {
        params.get(key).and_then(Self::parse)
    }
}

// ============================================================================
// SECTION: Render Mode
// ============================================================================

/// Rendering decision for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Populate the store, snapshot it, and render markup.
    Full,
    /// Populate the store and snapshot it without rendering markup.
    DataOnly,
    /// Bypass server-side bootstrap entirely.
    Disabled,
}

impl RenderMode {
    /// Resolves the render mode from the query parameter `key`.
    #[must_use]
    pub fn from_query(params: &QueryParams, key: &str) -> Self {
        match params.get(key) {
            Some(NO_SSR_MODE) => Self::Disabled,
            Some(DATA_ONLY_MODE) => Self::DataOnly,
            _ => Self::Full,
        }
    }

    /// Returns true when markup should be rendered.
    #[must_use]
    pub const fn renders_markup(self) -> bool {
        matches!(self, Self::Full)
    }

    /// Returns a stable label for the mode, as recorded in audit events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::DataOnly => "data_only",
            Self::Disabled => "disabled",
        }
    }
}
