// crates/convert-ssr-core/src/core/mod.rs
// ============================================================================
// Module: Convert SSR Core Types
// Description: Plain data types shared by the runtime and interfaces.
// Purpose: Group instruction, snapshot, conversion, and locals types.
// Dependencies: crate::core::*
// ============================================================================

//! ## Overview
//! Core types carry no behavior beyond parsing and serialization; the
//! runtime module drives them.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod conversion;
pub mod instruction;
pub mod locals;
pub mod snapshot;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use conversion::CONVERSIONS_SLOT;
pub use conversion::ConversionData;
pub use conversion::ConversionsState;
pub use instruction::BootstrapInstruction;
pub use instruction::DATA_ONLY_MODE;
pub use instruction::DEFAULT_BOOTSTRAP_QUERY_KEY;
pub use instruction::DEFAULT_MODE_QUERY_KEY;
pub use instruction::NO_SSR_MODE;
pub use instruction::QueryParams;
pub use instruction::RenderMode;
pub use locals::RenderLocals;
pub use snapshot::Snapshot;
