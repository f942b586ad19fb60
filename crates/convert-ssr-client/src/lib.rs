// crates/convert-ssr-client/src/lib.rs
// ============================================================================
// Module: Convert SSR Client
// Description: HTTP implementation of the conversion client interface.
// Purpose: Fetch conversion data over the network with bounded waits.
// Dependencies: convert-ssr-core, reqwest, url
// ============================================================================

//! ## Overview
//! [`HttpConversionClient`] issues a single GET per fetch against a configured
//! conversion endpoint. Connect and request timeouts are always set, redirects
//! are not followed, and response bodies are capped before decoding.
//! Invariants:
//! - Cleartext `http://` endpoints require `allow_http = true`.
//! - Endpoints with embedded credentials are rejected.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod http;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use http::ClientError;
pub use http::HttpClientConfig;
pub use http::HttpConversionClient;
