// crates/convert-ssr-config/src/lib.rs
// ============================================================================
// Module: Convert SSR Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for convert-ssr.toml semantics.
// Dependencies: convert-ssr-core, serde, toml
// ============================================================================

//! ## Overview
//! `convert-ssr-config` defines the configuration model for the bootstrap
//! server. Loading is strict and fail-closed: oversized files, unknown
//! fields, and out-of-range values are rejected before anything is built.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
