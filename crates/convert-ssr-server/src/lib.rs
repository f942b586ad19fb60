// crates/convert-ssr-server/src/lib.rs
// ============================================================================
// Module: Convert SSR Server Library
// Description: HTTP surface for server-side bootstrapping.
// Purpose: Expose the bootstrap middleware, page handler, and server assembly.
// Dependencies: axum, convert-ssr-core, convert-ssr-client, convert-ssr-config
// ============================================================================

//! ## Overview
//! The server crate mounts [`middleware::bootstrap_middleware`] in front of
//! the page template. The middleware stashes [`convert_ssr_core::RenderLocals`]
//! in request extensions; [`page::render_page`] reads them back.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod middleware;
pub mod page;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::BootstrapAuditEvent;
pub use audit::BootstrapAuditEventParams;
pub use audit::BootstrapOutcome;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use middleware::BootstrapRejection;
pub use middleware::BootstrapState;
pub use middleware::bootstrap_middleware;
pub use page::healthz;
pub use page::page_html;
pub use page::render_page;
pub use server::SsrServer;
pub use server::SsrServerError;
pub use server::build_router;
pub use server::build_strategy;
